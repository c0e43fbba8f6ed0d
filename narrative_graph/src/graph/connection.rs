//! Connections - directed edges from an output port to an input port.

use serde::{Deserialize, Serialize};

use super::{ConnectionId, NodeId, PortId};

/// A directed edge between two ports of two different nodes.
///
/// Only the graph store creates connections, after validating them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: ConnectionId,
    pub source_node_id: NodeId,
    pub source_port_id: PortId,
    pub target_node_id: NodeId,
    pub target_port_id: PortId,
}

impl Connection {
    /// Check if this connection touches a node at either end.
    pub fn involves_node(&self, node_id: &NodeId) -> bool {
        &self.source_node_id == node_id || &self.target_node_id == node_id
    }

    /// Check if this connection is bound to the given port of the given node.
    pub fn uses_port(&self, node_id: &NodeId, port_id: &PortId) -> bool {
        (&self.source_node_id == node_id && &self.source_port_id == port_id)
            || (&self.target_node_id == node_id && &self.target_port_id == port_id)
    }

    /// The `(source, target)` endpoint pair, without the connection id.
    pub fn endpoints(&self) -> ((&NodeId, &PortId), (&NodeId, &PortId)) {
        (
            (&self.source_node_id, &self.source_port_id),
            (&self.target_node_id, &self.target_port_id),
        )
    }
}
