//! Game mechanics vocabulary: effect kinds and operations, condition kinds,
//! comparison operators and the dynamic values they work on.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a rule keyword cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {category} '{value}'")]
pub struct ParseRuleError {
    pub category: &'static str,
    pub value: String,
}

impl ParseRuleError {
    fn new(category: &'static str, value: &str) -> Self {
        Self {
            category,
            value: value.to_string(),
        }
    }
}

/// What an effect changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    /// A player stat such as energy or stress.
    #[default]
    Stat,
    /// Relationship score with a character.
    Relationship,
    /// A global story flag.
    Flag,
    /// An inventory item.
    Item,
}

impl EffectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EffectKind::Stat => "stat",
            EffectKind::Relationship => "relationship",
            EffectKind::Flag => "flag",
            EffectKind::Item => "item",
        }
    }
}

/// How an effect combines its value with the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EffectOperation {
    #[default]
    Add,
    Subtract,
    Set,
    Multiply,
}

impl EffectOperation {
    /// Short symbol used in compact node previews.
    pub fn symbol(&self) -> &'static str {
        match self {
            EffectOperation::Add => "+=",
            EffectOperation::Subtract => "-=",
            EffectOperation::Set => "=",
            EffectOperation::Multiply => "*=",
        }
    }
}

/// What a condition inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConditionKind {
    #[default]
    Stat,
    Relationship,
    Flag,
    /// Current in-game day of the week.
    Day,
    /// Current in-game hour.
    Hour,
}

impl ConditionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionKind::Stat => "stat",
            ConditionKind::Relationship => "relationship",
            ConditionKind::Flag => "flag",
            ConditionKind::Day => "day",
            ConditionKind::Hour => "hour",
        }
    }
}

/// Comparison operator of a condition. Serialized as its symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Comparison {
    #[default]
    #[serde(rename = "==")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = ">")]
    Greater,
    #[serde(rename = ">=")]
    GreaterOrEqual,
    #[serde(rename = "<")]
    Less,
    #[serde(rename = "<=")]
    LessOrEqual,
}

impl Comparison {
    pub fn symbol(&self) -> &'static str {
        match self {
            Comparison::Equal => "==",
            Comparison::NotEqual => "!=",
            Comparison::Greater => ">",
            Comparison::GreaterOrEqual => ">=",
            Comparison::Less => "<",
            Comparison::LessOrEqual => "<=",
        }
    }
}

impl FromStr for Comparison {
    type Err = ParseRuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "==" | "=" => Ok(Comparison::Equal),
            "!=" => Ok(Comparison::NotEqual),
            ">" => Ok(Comparison::Greater),
            ">=" => Ok(Comparison::GreaterOrEqual),
            "<" => Ok(Comparison::Less),
            "<=" => Ok(Comparison::LessOrEqual),
            other => Err(ParseRuleError::new("comparison", other)),
        }
    }
}

impl FromStr for EffectOperation {
    type Err = ParseRuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "add" | "+=" => Ok(EffectOperation::Add),
            "subtract" | "-=" => Ok(EffectOperation::Subtract),
            "set" | "=" => Ok(EffectOperation::Set),
            "multiply" | "*=" => Ok(EffectOperation::Multiply),
            other => Err(ParseRuleError::new("effect operation", other)),
        }
    }
}

/// Dynamic value carried by conditions and effects.
///
/// Serialized untagged so records read naturally: `true`, `5`, `0.5`, `"text"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Default for RuleValue {
    fn default() -> Self {
        RuleValue::Int(0)
    }
}

impl std::fmt::Display for RuleValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleValue::Bool(b) => write!(f, "{}", b),
            RuleValue::Int(i) => write!(f, "{}", i),
            RuleValue::Float(x) => write!(f, "{}", x),
            RuleValue::Text(s) => write!(f, "\"{}\"", s),
        }
    }
}

impl From<bool> for RuleValue {
    fn from(value: bool) -> Self {
        RuleValue::Bool(value)
    }
}

impl From<i64> for RuleValue {
    fn from(value: i64) -> Self {
        RuleValue::Int(value)
    }
}

impl From<i32> for RuleValue {
    fn from(value: i32) -> Self {
        RuleValue::Int(value as i64)
    }
}

impl From<f64> for RuleValue {
    fn from(value: f64) -> Self {
        RuleValue::Float(value)
    }
}

impl From<&str> for RuleValue {
    fn from(value: &str) -> Self {
        RuleValue::Text(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("==", Comparison::Equal)]
    #[case("=", Comparison::Equal)]
    #[case("!=", Comparison::NotEqual)]
    #[case(">", Comparison::Greater)]
    #[case(" >= ", Comparison::GreaterOrEqual)]
    #[case("<", Comparison::Less)]
    #[case("<=", Comparison::LessOrEqual)]
    fn test_parse_comparison(#[case] input: &str, #[case] expected: Comparison) {
        assert_eq!(input.parse::<Comparison>().unwrap(), expected);
    }

    #[test]
    fn test_parse_unknown_comparison() {
        let err = "=>".parse::<Comparison>().unwrap_err();
        assert_eq!(err.category, "comparison");
        assert_eq!(err.to_string(), "unknown comparison '=>'");
    }

    #[test]
    fn test_comparison_serializes_as_symbol() {
        assert_eq!(serde_json::to_string(&Comparison::GreaterOrEqual).unwrap(), "\">=\"");
        let parsed: Comparison = serde_json::from_str("\"!=\"").unwrap();
        assert_eq!(parsed, Comparison::NotEqual);
    }

    #[test]
    fn test_effect_operation_symbols() {
        assert_eq!("+=".parse::<EffectOperation>().unwrap(), EffectOperation::Add);
        assert_eq!("multiply".parse::<EffectOperation>().unwrap(), EffectOperation::Multiply);
        assert_eq!(EffectOperation::Subtract.symbol(), "-=");
        assert!("divide".parse::<EffectOperation>().is_err());
    }

    #[test]
    fn test_rule_value_untagged() {
        let values = vec![
            RuleValue::Bool(true),
            RuleValue::Int(-3),
            RuleValue::Float(0.25),
            RuleValue::Text("met_boss".to_string()),
        ];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, "[true,-3,0.25,\"met_boss\"]");

        let parsed: Vec<RuleValue> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, values);
    }

    #[test]
    fn test_whole_float_stays_float() {
        let json = serde_json::to_string(&RuleValue::Float(2.0)).unwrap();
        let parsed: RuleValue = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, RuleValue::Float(2.0));
    }
}
