//! Graph model - nodes, ports, connections and the store that owns them.
//!
//! The graph consists of:
//! - **Nodes**: typed narrative units with ordered input and output ports
//! - **Connections**: directed edges from an output port to an input port
//! - **Metadata**: entry node, title and tags of the authored unit

pub mod ids;
mod connection;
mod node;
mod port;
mod store;

pub use connection::*;
pub use ids::{ConnectionId, IdAllocator, NodeId, PortId};
pub use node::*;
pub use port::*;
pub use store::*;

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::error::IntegrityError;
use crate::nodes::{NodeBehavior, NodePayload};

/// A point in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Position) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

impl std::ops::Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Descriptive data about the authored unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct GraphMetadata {
    /// Node where narrative flow starts.
    pub entry_node_id: Option<NodeId>,
    pub title: String,
    pub tags: Vec<String>,
}

/// The full authored unit. Snapshots in the history are plain copies of it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Graph {
    pub nodes: HashMap<NodeId, Node>,
    pub connections: HashMap<ConnectionId, Connection>,
    pub metadata: GraphMetadata,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn connection(&self, id: &ConnectionId) -> Option<&Connection> {
        self.connections.get(id)
    }

    /// Node ids sorted by numeric suffix, then lexically.
    pub fn sorted_node_ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<_> = self.nodes.keys().cloned().collect();
        ids.sort_by(|a, b| {
            (a.numeric_suffix(), a.as_str()).cmp(&(b.numeric_suffix(), b.as_str()))
        });
        ids
    }

    /// Connection ids sorted by numeric suffix, then lexically.
    pub fn sorted_connection_ids(&self) -> Vec<ConnectionId> {
        let mut ids: Vec<_> = self.connections.keys().cloned().collect();
        ids.sort_by(|a, b| {
            (a.numeric_suffix(), a.as_str()).cmp(&(b.numeric_suffix(), b.as_str()))
        });
        ids
    }

    /// Check every structural invariant of the graph.
    pub fn validate(&self) -> Result<(), IntegrityError> {
        for (id, node) in &self.nodes {
            if id != &node.id {
                return Err(IntegrityError::KeyMismatch {
                    key: id.clone(),
                    node_id: node.id.clone(),
                });
            }

            let mut seen = HashSet::new();
            for port in node.inputs.iter().chain(node.outputs.iter()) {
                if !seen.insert(&port.id) {
                    return Err(IntegrityError::DuplicatePort {
                        node_id: id.clone(),
                        port_id: port.id.clone(),
                    });
                }
            }

            let layout = node.payload.port_layout();
            let same_ids = |ports: &[Port], wanted: &[Port]| {
                ports.len() == wanted.len()
                    && ports.iter().zip(wanted.iter()).all(|(a, b)| a.id == b.id)
            };
            if !same_ids(&node.inputs, &layout.inputs) || !same_ids(&node.outputs, &layout.outputs)
            {
                return Err(IntegrityError::PortLayoutMismatch(id.clone()));
            }

            if let NodePayload::Choice(choice) = &node.payload {
                for option in &choice.options {
                    let bound = node
                        .outputs
                        .iter()
                        .filter(|p| p.id == option.output_id)
                        .count();
                    if bound != 1 {
                        return Err(IntegrityError::PortLayoutMismatch(id.clone()));
                    }
                }
            }
        }

        for (id, conn) in &self.connections {
            if id != &conn.id {
                return Err(IntegrityError::ConnectionKeyMismatch(id.clone()));
            }
            if conn.source_node_id == conn.target_node_id {
                return Err(IntegrityError::SelfLoop(id.clone()));
            }
            let source = self
                .nodes
                .get(&conn.source_node_id)
                .ok_or_else(|| IntegrityError::DanglingConnection(id.clone()))?;
            let target = self
                .nodes
                .get(&conn.target_node_id)
                .ok_or_else(|| IntegrityError::DanglingConnection(id.clone()))?;
            if !source.has_output(&conn.source_port_id) || !target.has_input(&conn.target_port_id)
            {
                return Err(IntegrityError::InvalidPortBinding(id.clone()));
            }
        }

        if let Some(entry) = &self.metadata.entry_node_id {
            if !self.nodes.contains_key(entry) {
                return Err(IntegrityError::MissingEntryNode(entry.clone()));
            }
        }

        Ok(())
    }
}
