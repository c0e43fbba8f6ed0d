//! Node variants - the closed set of node kinds and their payloads.
//!
//! Each variant is a plain data struct implementing [`NodeBehavior`]:
//! - a header label for display
//! - a port layout (its port generation rule)
//! - content lines consumed by the render adapter
//!
//! [`NodePayload`] is the sum of all variants. Serialization is internally
//! tagged by `type`, so a node record carries its variant fields next to the
//! common envelope fields.

mod choice;
mod condition;
mod dialogue;
mod effect;
mod timed;

pub use choice::*;
pub use condition::*;
pub use dialogue::*;
pub use effect::*;
pub use timed::*;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::graph::Port;

/// Ports a payload wants its node to have.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PortLayout {
    pub inputs: Vec<Port>,
    pub outputs: Vec<Port>,
}

impl PortLayout {
    /// One flow input and one flow output.
    pub fn single_flow() -> Self {
        Self {
            inputs: vec![Port::flow("in")],
            outputs: vec![Port::flow("out")],
        }
    }
}

/// Capabilities every node variant provides.
pub trait NodeBehavior {
    /// Short label shown in the node header.
    fn header_label(&self) -> String;

    /// Ports this payload requires, in display order.
    fn port_layout(&self) -> PortLayout;

    /// Text lines summarizing the payload for the node body.
    fn content_lines(&self) -> Vec<String>;
}

/// Discriminant of the node variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Dialogue,
    Choice,
    Condition,
    Effect,
    Email,
    Meeting,
    Task,
    Message,
}

impl NodeKind {
    /// All kinds, in quick-add menu order.
    pub const ALL: [NodeKind; 8] = [
        NodeKind::Dialogue,
        NodeKind::Choice,
        NodeKind::Condition,
        NodeKind::Effect,
        NodeKind::Email,
        NodeKind::Meeting,
        NodeKind::Task,
        NodeKind::Message,
    ];

    /// Discriminant as written in records.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Dialogue => "dialogue",
            NodeKind::Choice => "choice",
            NodeKind::Condition => "condition",
            NodeKind::Effect => "effect",
            NodeKind::Email => "email",
            NodeKind::Meeting => "meeting",
            NodeKind::Task => "task",
            NodeKind::Message => "message",
        }
    }

    /// Human readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            NodeKind::Dialogue => "Dialogue",
            NodeKind::Choice => "Choice",
            NodeKind::Condition => "Condition",
            NodeKind::Effect => "Effect",
            NodeKind::Email => "Email",
            NodeKind::Meeting => "Meeting",
            NodeKind::Task => "Task",
            NodeKind::Message => "Message",
        }
    }

    /// Whether this kind carries a trigger mode.
    pub fn is_timed(&self) -> bool {
        matches!(
            self,
            NodeKind::Email | NodeKind::Meeting | NodeKind::Task | NodeKind::Message
        )
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or(())
    }
}

/// Variant-specific node data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodePayload {
    Dialogue(DialogueData),
    Choice(ChoiceData),
    Condition(ConditionData),
    Effect(EffectData),
    Email(EmailData),
    Meeting(MeetingData),
    Task(TaskData),
    Message(MessageData),
}

impl NodePayload {
    /// Default payload for a freshly created node of `kind`.
    pub fn default_for(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Dialogue => NodePayload::Dialogue(DialogueData::default()),
            NodeKind::Choice => {
                NodePayload::Choice(ChoiceData::with_options(["Option 1", "Option 2"]))
            }
            NodeKind::Condition => NodePayload::Condition(ConditionData::default()),
            NodeKind::Effect => NodePayload::Effect(EffectData::default()),
            NodeKind::Email => NodePayload::Email(EmailData::default()),
            NodeKind::Meeting => NodePayload::Meeting(MeetingData::default()),
            NodeKind::Task => NodePayload::Task(TaskData::default()),
            NodeKind::Message => NodePayload::Message(MessageData::default()),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            NodePayload::Dialogue(_) => NodeKind::Dialogue,
            NodePayload::Choice(_) => NodeKind::Choice,
            NodePayload::Condition(_) => NodeKind::Condition,
            NodePayload::Effect(_) => NodeKind::Effect,
            NodePayload::Email(_) => NodeKind::Email,
            NodePayload::Meeting(_) => NodeKind::Meeting,
            NodePayload::Task(_) => NodeKind::Task,
            NodePayload::Message(_) => NodeKind::Message,
        }
    }

    fn behavior(&self) -> &dyn NodeBehavior {
        match self {
            NodePayload::Dialogue(data) => data,
            NodePayload::Choice(data) => data,
            NodePayload::Condition(data) => data,
            NodePayload::Effect(data) => data,
            NodePayload::Email(data) => data,
            NodePayload::Meeting(data) => data,
            NodePayload::Task(data) => data,
            NodePayload::Message(data) => data,
        }
    }

    /// Trigger mode of a timed-event payload.
    pub fn trigger_mode(&self) -> Option<TriggerMode> {
        match self {
            NodePayload::Email(data) => Some(data.trigger_mode),
            NodePayload::Meeting(data) => Some(data.trigger_mode),
            NodePayload::Task(data) => Some(data.trigger_mode),
            NodePayload::Message(data) => Some(data.trigger_mode),
            _ => None,
        }
    }

    /// Set the trigger mode. Returns false for payloads without one.
    pub fn set_trigger_mode(&mut self, mode: TriggerMode) -> bool {
        match self {
            NodePayload::Email(data) => data.trigger_mode = mode,
            NodePayload::Meeting(data) => data.trigger_mode = mode,
            NodePayload::Task(data) => data.trigger_mode = mode,
            NodePayload::Message(data) => data.trigger_mode = mode,
            _ => return false,
        }
        true
    }

    /// Repair payload-owned port ids so each one is unique and well formed.
    /// Returns how many ports were rebound.
    pub fn normalize_ports(&mut self) -> usize {
        match self {
            NodePayload::Choice(data) => data.normalize_ports(),
            NodePayload::Condition(data) => data.normalize_ports(),
            _ => 0,
        }
    }

    /// Apply a partial update. Returns the patch back if it targets another kind.
    pub fn apply(&mut self, patch: NodePatch) -> Result<(), NodePatch> {
        match (self, patch) {
            (NodePayload::Dialogue(data), NodePatch::Dialogue(p)) => data.apply(p),
            (NodePayload::Choice(data), NodePatch::Choice(p)) => data.apply(p),
            (NodePayload::Condition(data), NodePatch::Condition(p)) => data.apply(p),
            (NodePayload::Effect(data), NodePatch::Effect(p)) => data.apply(p),
            (NodePayload::Email(data), NodePatch::Email(p)) => data.apply(p),
            (NodePayload::Meeting(data), NodePatch::Meeting(p)) => data.apply(p),
            (NodePayload::Task(data), NodePatch::Task(p)) => data.apply(p),
            (NodePayload::Message(data), NodePatch::Message(p)) => data.apply(p),
            (_, patch) => return Err(patch),
        }
        Ok(())
    }
}

impl NodeBehavior for NodePayload {
    fn header_label(&self) -> String {
        self.behavior().header_label()
    }

    fn port_layout(&self) -> PortLayout {
        self.behavior().port_layout()
    }

    fn content_lines(&self) -> Vec<String> {
        self.behavior().content_lines()
    }
}

/// Partial payload sent by the property panel.
#[derive(Debug, Clone, PartialEq)]
pub enum NodePatch {
    Dialogue(DialoguePatch),
    Choice(ChoicePatch),
    Condition(ConditionPatch),
    Effect(EffectPatch),
    Email(EmailPatch),
    Meeting(MeetingPatch),
    Task(TaskPatch),
    Message(MessagePatch),
}

impl NodePatch {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodePatch::Dialogue(_) => NodeKind::Dialogue,
            NodePatch::Choice(_) => NodeKind::Choice,
            NodePatch::Condition(_) => NodeKind::Condition,
            NodePatch::Effect(_) => NodeKind::Effect,
            NodePatch::Email(_) => NodeKind::Email,
            NodePatch::Meeting(_) => NodeKind::Meeting,
            NodePatch::Task(_) => NodeKind::Task,
            NodePatch::Message(_) => NodeKind::Message,
        }
    }
}

/// Shorten `text` to at most `max_chars` characters, marking the cut.
pub(crate) fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}
