//! Choice nodes - the player picks one of several options.
//!
//! Every option owns exactly one output port, referenced by `output_id`. The
//! node's outputs are generated from the option list, so adding or removing an
//! option adds or removes its port in the same step.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::{truncate, Effect, NodeBehavior, PortLayout};
use crate::graph::ids::next_local_port_id;
use crate::graph::{Port, PortId};

const OPTION_PORT_PREFIX: &str = "option";

/// One selectable option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceOption {
    pub text: String,

    /// Hides the option unless the tag is active (e.g. `"tired"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask: Option<String>,

    /// Effects applied when the option is picked.
    #[serde(default)]
    pub effects: Vec<Effect>,

    /// Output port this option leads through.
    pub output_id: PortId,
}

/// An option as supplied by an editing panel, before a port is bound to it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChoiceOptionDraft {
    pub text: String,
    pub mask: Option<String>,
    pub effects: Vec<Effect>,
    /// Port of an existing option. `None` requests a new port.
    pub output_id: Option<PortId>,
}

impl ChoiceOptionDraft {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

impl From<&ChoiceOption> for ChoiceOptionDraft {
    fn from(option: &ChoiceOption) -> Self {
        Self {
            text: option.text.clone(),
            mask: option.mask.clone(),
            effects: option.effects.clone(),
            output_id: Some(option.output_id.clone()),
        }
    }
}

/// Player choice between options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ChoiceData {
    pub options: Vec<ChoiceOption>,
}

impl ChoiceData {
    /// Build a choice from option texts.
    pub fn with_options<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut data = Self::default();
        for text in texts {
            data.add_option(text);
        }
        data
    }

    /// Append an option bound to a freshly allocated port. Returns the port id.
    pub fn add_option(&mut self, text: impl Into<String>) -> PortId {
        let output_id = next_local_port_id(
            OPTION_PORT_PREFIX,
            self.options.iter().map(|o| &o.output_id),
        );
        self.options.push(ChoiceOption {
            text: text.into(),
            mask: None,
            effects: Vec::new(),
            output_id: output_id.clone(),
        });
        output_id
    }

    /// Remove the option at `index`, returning it.
    pub fn remove_option(&mut self, index: usize) -> Option<ChoiceOption> {
        if index < self.options.len() {
            Some(self.options.remove(index))
        } else {
            None
        }
    }

    /// Find the option bound to an output port.
    pub fn option_for_port(&self, port_id: &PortId) -> Option<&ChoiceOption> {
        self.options.iter().find(|o| &o.output_id == port_id)
    }

    pub fn apply(&mut self, patch: ChoicePatch) {
        if let Some(drafts) = patch.options {
            self.replace_options(drafts);
        }
    }

    /// Rebind options whose port is not an `option-N` id, or repeats the port
    /// of an earlier option, to a fresh port. Returns how many were rebound.
    pub fn normalize_ports(&mut self) -> usize {
        let mut claimed: HashSet<PortId> = HashSet::new();
        let stale: Vec<usize> = self
            .options
            .iter()
            .enumerate()
            .filter(|(_, o)| {
                !(is_option_port(&o.output_id) && claimed.insert(o.output_id.clone()))
            })
            .map(|(index, _)| index)
            .collect();

        let mut taken: Vec<PortId> = claimed.into_iter().collect();
        for &index in &stale {
            let output_id = next_local_port_id(OPTION_PORT_PREFIX, taken.iter());
            taken.push(output_id.clone());
            self.options[index].output_id = output_id;
        }
        stale.len()
    }

    /// Replace the option list, keeping existing ports where drafts name them.
    ///
    /// Drafts without a port, naming a port that is not an option port, or
    /// naming a port already claimed by an earlier draft, get a new one.
    fn replace_options(&mut self, drafts: Vec<ChoiceOptionDraft>) {
        let mut claimed: HashSet<PortId> = HashSet::new();
        let mut pending = Vec::new();
        let mut options: Vec<Option<ChoiceOption>> = Vec::with_capacity(drafts.len());

        for (index, draft) in drafts.into_iter().enumerate() {
            let kept = draft
                .output_id
                .clone()
                .filter(|id| is_option_port(id) && claimed.insert(id.clone()));
            match kept {
                Some(output_id) => options.push(Some(ChoiceOption {
                    text: draft.text,
                    mask: draft.mask,
                    effects: draft.effects,
                    output_id,
                })),
                None => {
                    pending.push((index, draft));
                    options.push(None);
                }
            }
        }

        // Fresh ports must not collide with ports of options being replaced either.
        let mut taken: Vec<PortId> = claimed.into_iter().collect();
        taken.extend(self.options.iter().map(|o| o.output_id.clone()));

        for (index, draft) in pending {
            let output_id = next_local_port_id(OPTION_PORT_PREFIX, taken.iter());
            taken.push(output_id.clone());
            options[index] = Some(ChoiceOption {
                text: draft.text,
                mask: draft.mask,
                effects: draft.effects,
                output_id,
            });
        }

        self.options = options.into_iter().flatten().collect();
    }
}

/// `option-N` with a suffix the allocator can still step past.
fn is_option_port(id: &PortId) -> bool {
    id.as_str()
        .rsplit_once('-')
        .is_some_and(|(head, _)| head == OPTION_PORT_PREFIX)
        && id.numeric_suffix().is_some()
}

/// Partial update for a choice node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChoicePatch {
    /// New option list, in order.
    pub options: Option<Vec<ChoiceOptionDraft>>,
}

impl NodeBehavior for ChoiceData {
    fn header_label(&self) -> String {
        format!("Choice ({})", self.options.len())
    }

    fn port_layout(&self) -> PortLayout {
        PortLayout {
            inputs: vec![Port::flow("in")],
            outputs: self
                .options
                .iter()
                .map(|o| Port::flow(o.output_id.clone()).with_label(truncate(&o.text, 24)))
                .collect(),
        }
    }

    fn content_lines(&self) -> Vec<String> {
        self.options
            .iter()
            .enumerate()
            .map(|(i, o)| match &o.mask {
                Some(mask) => format!("{}. {} [{}]", i + 1, truncate(&o.text, 30), mask),
                None => format!("{}. {}", i + 1, truncate(&o.text, 30)),
            })
            .collect()
    }
}
