//! Error types of the editor core.

use thiserror::Error;

use crate::graph::{ConnectionId, NodeId, PortId};
use crate::nodes::NodeKind;

pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors raised by graph store operations that take explicit ids.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Node already exists: {0}")]
    DuplicateNode(NodeId),

    #[error("Connection not found: {0}")]
    ConnectionNotFound(ConnectionId),

    #[error("Node '{node_id}' is a {found} node, but the update targets {expected} nodes")]
    PatchMismatch {
        node_id: NodeId,
        expected: NodeKind,
        found: NodeKind,
    },

    #[error("Node '{0}' has no trigger mode")]
    NotTimed(NodeId),

    #[error("Choice node '{node_id}' has no option at index {index}")]
    OptionIndexOutOfRange { node_id: NodeId, index: usize },
}

/// Failure to read or write a portable graph record as a whole.
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Invalid graph record JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure to load editor configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// A broken structural invariant. Seeing one means the core has a bug.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntegrityError {
    #[error("Node stored under '{key}' has id '{node_id}'")]
    KeyMismatch { key: NodeId, node_id: NodeId },

    #[error("Connection stored under '{0}' has a different id")]
    ConnectionKeyMismatch(ConnectionId),

    #[error("Node '{node_id}' declares port '{port_id}' more than once")]
    DuplicatePort { node_id: NodeId, port_id: PortId },

    #[error("Ports of node '{0}' do not match its payload")]
    PortLayoutMismatch(NodeId),

    #[error("Connection '{0}' references a missing node")]
    DanglingConnection(ConnectionId),

    #[error("Connection '{0}' is not bound to an output and an input port")]
    InvalidPortBinding(ConnectionId),

    #[error("Connection '{0}' connects a node to itself")]
    SelfLoop(ConnectionId),

    #[error("Entry node '{0}' does not exist")]
    MissingEntryNode(NodeId),
}
