//! Effect nodes - apply stat, relationship, flag or item changes.

use game_rules::{EffectKind, EffectOperation, RuleValue};
use serde::{Deserialize, Serialize};

use super::{NodeBehavior, PortLayout};

/// A single change to game state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Effect {
    pub kind: EffectKind,
    /// Stat name, character id, flag name or item id depending on `kind`.
    pub target: String,
    pub operation: EffectOperation,
    pub value: RuleValue,
}

impl Effect {
    pub fn new(
        kind: EffectKind,
        target: impl Into<String>,
        operation: EffectOperation,
        value: impl Into<RuleValue>,
    ) -> Self {
        Self {
            kind,
            target: target.into(),
            operation,
            value: value.into(),
        }
    }

    /// One-line summary such as `stat energy -= 10`.
    pub fn summary(&self) -> String {
        format!(
            "{} {} {} {}",
            self.kind.as_str(),
            self.target,
            self.operation.symbol(),
            self.value
        )
    }
}

/// Ordered list of effects applied when flow passes through the node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EffectData {
    pub effects: Vec<Effect>,
}

impl EffectData {
    pub fn apply(&mut self, patch: EffectPatch) {
        if let Some(effects) = patch.effects {
            self.effects = effects;
        }
    }
}

/// Partial update for an effect node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EffectPatch {
    pub effects: Option<Vec<Effect>>,
}

impl NodeBehavior for EffectData {
    fn header_label(&self) -> String {
        format!("Effects ({})", self.effects.len())
    }

    fn port_layout(&self) -> PortLayout {
        PortLayout::single_flow()
    }

    fn content_lines(&self) -> Vec<String> {
        if self.effects.is_empty() {
            return vec!["No effects".to_string()];
        }
        self.effects.iter().map(Effect::summary).collect()
    }
}
