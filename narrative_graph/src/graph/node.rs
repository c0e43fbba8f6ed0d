//! The node envelope shared by every variant.

use serde::{Deserialize, Serialize};

use super::{NodeId, Port, PortId, PortSide, Position};
use crate::nodes::{NodeBehavior, NodeKind, NodePayload, TriggerMode};

/// Ports dropped when a node regenerated its port lists.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RemovedPorts {
    pub inputs: Vec<PortId>,
    pub outputs: Vec<PortId>,
}

impl RemovedPorts {
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty() && self.outputs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inputs.len() + self.outputs.len()
    }
}

/// A node in the graph: identity, layout position, ports and payload.
///
/// Port lists are always derived from the payload through [`Node::sync_ports`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,

    /// Authoring layout only.
    pub position: Position,

    #[serde(default)]
    pub inputs: Vec<Port>,

    #[serde(default)]
    pub outputs: Vec<Port>,

    #[serde(flatten)]
    pub payload: NodePayload,
}

impl Node {
    /// Create a node of `kind` with default payload.
    pub fn new(id: NodeId, kind: NodeKind, position: Position) -> Self {
        Self::with_payload(id, position, NodePayload::default_for(kind))
    }

    /// Create a node around an existing payload.
    pub fn with_payload(id: NodeId, position: Position, payload: NodePayload) -> Self {
        let mut node = Self {
            id,
            position,
            inputs: Vec::new(),
            outputs: Vec::new(),
            payload,
        };
        node.sync_ports();
        node
    }

    pub fn kind(&self) -> NodeKind {
        self.payload.kind()
    }

    /// Header label of the variant.
    pub fn label(&self) -> String {
        self.payload.header_label()
    }

    pub fn input(&self, port_id: &PortId) -> Option<&Port> {
        self.inputs.iter().find(|p| &p.id == port_id)
    }

    pub fn output(&self, port_id: &PortId) -> Option<&Port> {
        self.outputs.iter().find(|p| &p.id == port_id)
    }

    pub fn has_input(&self, port_id: &PortId) -> bool {
        self.input(port_id).is_some()
    }

    pub fn has_output(&self, port_id: &PortId) -> bool {
        self.output(port_id).is_some()
    }

    /// Which list contains `port_id`, if any.
    pub fn port_side(&self, port_id: &PortId) -> Option<PortSide> {
        if self.has_input(port_id) {
            Some(PortSide::Input)
        } else if self.has_output(port_id) {
            Some(PortSide::Output)
        } else {
            None
        }
    }

    pub fn trigger_mode(&self) -> Option<TriggerMode> {
        self.payload.trigger_mode()
    }

    /// Rebuild the port lists from the payload's layout.
    ///
    /// Surviving ports keep their identity (only labels refresh). Choice
    /// options with a repeated or foreign port id are rebound first. Returns
    /// the ports that no longer exist so the caller can drop their connections.
    pub fn sync_ports(&mut self) -> RemovedPorts {
        self.payload.normalize_ports();
        let layout = self.payload.port_layout();

        let removed = RemovedPorts {
            inputs: missing_ports(&self.inputs, &layout.inputs),
            outputs: missing_ports(&self.outputs, &layout.outputs),
        };

        self.inputs = layout.inputs;
        self.outputs = layout.outputs;
        removed
    }

    /// Deep copy under a new id, shifted by `offset`.
    pub fn duplicate(&self, id: NodeId, offset: Position) -> Self {
        let mut copy = self.clone();
        copy.id = id;
        copy.position = self.position + offset;
        copy
    }
}

fn missing_ports(current: &[Port], wanted: &[Port]) -> Vec<PortId> {
    current
        .iter()
        .filter(|port| !wanted.iter().any(|w| w.id == port.id))
        .map(|port| port.id.clone())
        .collect()
}
