//! Condition nodes - branch on a comparison against game state.

use game_rules::{Comparison, ConditionKind, RuleValue};
use serde::{Deserialize, Serialize};

use super::{NodeBehavior, PortLayout};
use crate::graph::{Port, PortId};

/// A comparison such as `stat energy >= 20`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ConditionExpr {
    pub kind: ConditionKind,
    pub operator: Comparison,
    pub target: String,
    pub value: RuleValue,
}

impl ConditionExpr {
    pub fn new(
        kind: ConditionKind,
        target: impl Into<String>,
        operator: Comparison,
        value: impl Into<RuleValue>,
    ) -> Self {
        Self {
            kind,
            operator,
            target: target.into(),
            value: value.into(),
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "{} {} {} {}",
            self.kind.as_str(),
            self.target,
            self.operator.symbol(),
            self.value
        )
    }
}

/// Two-way branch. Flow leaves through the true or the false output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionData {
    #[serde(default)]
    pub condition: ConditionExpr,
    #[serde(default = "default_true_output")]
    pub true_output_id: PortId,
    #[serde(default = "default_false_output")]
    pub false_output_id: PortId,
}

fn default_true_output() -> PortId {
    PortId::from("true")
}

fn default_false_output() -> PortId {
    PortId::from("false")
}

impl Default for ConditionData {
    fn default() -> Self {
        Self {
            condition: ConditionExpr::default(),
            true_output_id: default_true_output(),
            false_output_id: default_false_output(),
        }
    }
}

impl ConditionData {
    pub fn new(condition: ConditionExpr) -> Self {
        Self {
            condition,
            ..Default::default()
        }
    }

    /// Fall back to the default `true`/`false` ports when the branch ports
    /// collide with each other or with the input. Returns how many were rebound.
    pub fn normalize_ports(&mut self) -> usize {
        let input = PortId::from("in");
        if self.true_output_id != self.false_output_id
            && self.true_output_id != input
            && self.false_output_id != input
        {
            return 0;
        }
        let rebound = usize::from(self.true_output_id != default_true_output())
            + usize::from(self.false_output_id != default_false_output());
        self.true_output_id = default_true_output();
        self.false_output_id = default_false_output();
        rebound
    }

    pub fn apply(&mut self, patch: ConditionPatch) {
        if let Some(kind) = patch.kind {
            self.condition.kind = kind;
        }
        if let Some(operator) = patch.operator {
            self.condition.operator = operator;
        }
        if let Some(target) = patch.target {
            self.condition.target = target;
        }
        if let Some(value) = patch.value {
            self.condition.value = value;
        }
    }
}

/// Partial update for a condition node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConditionPatch {
    pub kind: Option<ConditionKind>,
    pub operator: Option<Comparison>,
    pub target: Option<String>,
    pub value: Option<RuleValue>,
}

impl NodeBehavior for ConditionData {
    fn header_label(&self) -> String {
        "Condition".to_string()
    }

    fn port_layout(&self) -> PortLayout {
        PortLayout {
            inputs: vec![Port::flow("in")],
            outputs: vec![
                Port::flow(self.true_output_id.clone()).with_label("True"),
                Port::flow(self.false_output_id.clone()).with_label("False"),
            ],
        }
    }

    fn content_lines(&self) -> Vec<String> {
        vec![self.condition.summary()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_labeled_outputs() {
        let layout = ConditionData::default().port_layout();
        assert_eq!(layout.inputs.len(), 1);
        let labels: Vec<_> = layout.outputs.iter().map(|p| p.label.clone().unwrap()).collect();
        assert_eq!(labels, vec!["True", "False"]);
    }

    #[test]
    fn test_colliding_branch_ports_fall_back_to_defaults() {
        let mut shared = ConditionData {
            true_output_id: PortId::from("branch"),
            false_output_id: PortId::from("branch"),
            ..Default::default()
        };
        assert_eq!(shared.normalize_ports(), 2);
        assert_eq!(
            shared.port_layout().outputs,
            ConditionData::default().port_layout().outputs
        );

        let mut custom = ConditionData {
            true_output_id: PortId::from("yes"),
            false_output_id: PortId::from("no"),
            ..Default::default()
        };
        assert_eq!(custom.normalize_ports(), 0);
        assert_eq!(custom.true_output_id.as_str(), "yes");

        let mut reserved = ConditionData {
            false_output_id: PortId::from("in"),
            ..Default::default()
        };
        assert_eq!(reserved.normalize_ports(), 1);
    }

    #[test]
    fn test_summary() {
        let data = ConditionData::new(ConditionExpr::new(
            ConditionKind::Stat,
            "energy",
            Comparison::GreaterOrEqual,
            20,
        ));
        assert_eq!(data.content_lines(), vec!["stat energy >= 20".to_string()]);
    }

    #[test]
    fn test_patch_operator_only() {
        let mut data = ConditionData::default();
        data.apply(ConditionPatch {
            operator: Some(Comparison::Less),
            ..Default::default()
        });
        assert_eq!(data.condition.operator, Comparison::Less);
        assert_eq!(data.condition.kind, ConditionKind::Stat);
    }

    #[test]
    fn test_missing_output_ids_fall_back() {
        let data: ConditionData = serde_json::from_str(r#"{"condition": {"kind": "flag", "operator": "==", "target": "met_boss", "value": true}}"#).unwrap();
        assert_eq!(data.true_output_id.as_str(), "true");
        assert_eq!(data.false_output_id.as_str(), "false");
        assert_eq!(data.condition.value, RuleValue::Bool(true));
    }
}
