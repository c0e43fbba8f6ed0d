//! Selected nodes and connections.

use crate::graph::{ConnectionId, Graph, NodeId};

/// Current selection, in the order items were selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    nodes: Vec<NodeId>,
    connections: Vec<ConnectionId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn connections(&self) -> &[ConnectionId] {
        &self.connections
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.connections.is_empty()
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.nodes.contains(id)
    }

    pub fn contains_connection(&self, id: &ConnectionId) -> bool {
        self.connections.contains(id)
    }

    /// Select a node. Without `additive` the node replaces the whole selection.
    pub fn select_node(&mut self, id: NodeId, additive: bool) {
        if !additive {
            self.clear();
        }
        if !self.nodes.contains(&id) {
            self.nodes.push(id);
        }
    }

    /// Select a connection. Without `additive` it replaces the whole selection.
    pub fn select_connection(&mut self, id: ConnectionId, additive: bool) {
        if !additive {
            self.clear();
        }
        if !self.connections.contains(&id) {
            self.connections.push(id);
        }
    }

    /// Replace the selection with exactly these nodes.
    pub fn set_nodes(&mut self, ids: impl IntoIterator<Item = NodeId>) {
        self.clear();
        for id in ids {
            if !self.nodes.contains(&id) {
                self.nodes.push(id);
            }
        }
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.connections.clear();
    }

    /// Drop ids that no longer exist in `graph`. Returns true if anything was dropped.
    pub fn retain_existing(&mut self, graph: &Graph) -> bool {
        let before = self.nodes.len() + self.connections.len();
        self.nodes.retain(|id| graph.nodes.contains_key(id));
        self.connections
            .retain(|id| graph.connections.contains_key(id));
        before != self.nodes.len() + self.connections.len()
    }
}
