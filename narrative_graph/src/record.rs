//! Portable graph record - the export/import format.
//!
//! ```json
//! {
//!   "nodes": [{ "id", "type", "position": {"x","y"}, "inputs", "outputs", ...variant fields }],
//!   "connections": [{ "id", "sourceNodeId", "sourcePortId", "targetNodeId", "targetPortId" }],
//!   "metadata": { "entryNodeId", "title", "tags" }
//! }
//! ```
//!
//! Import never aborts on a single bad node or connection. Records it cannot
//! use are skipped and listed in the [`ImportReport`].

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{info, warn};

use crate::error::RecordError;
use crate::graph::{Connection, ConnectionId, ConnectionRejection, GraphMetadata, GraphStore, Node, NodeId};
use crate::nodes::NodeKind;

/// A node entry of a record.
///
/// Entries this version cannot read are kept verbatim so they can be reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeRecord {
    Known(Node),
    Unrecognized(serde_json::Value),
}

/// The serialized graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GraphRecord {
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub metadata: GraphMetadata,
}

impl GraphRecord {
    /// Export the store's graph. Nodes and connections are ordered by id.
    pub fn from_store(store: &GraphStore) -> Self {
        let graph = store.graph();
        let nodes: Vec<NodeRecord> = graph
            .sorted_node_ids()
            .iter()
            .filter_map(|id| graph.node(id))
            .cloned()
            .map(NodeRecord::Known)
            .collect();
        let connections: Vec<Connection> = graph
            .sorted_connection_ids()
            .iter()
            .filter_map(|id| graph.connection(id))
            .cloned()
            .collect();

        info!(
            nodes = nodes.len(),
            connections = connections.len(),
            "graph exported"
        );
        Self {
            nodes,
            connections,
            metadata: graph.metadata.clone(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, RecordError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> Result<String, RecordError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_string_pretty(&self) -> Result<String, RecordError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Node entries that were read successfully.
    pub fn known_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter_map(|record| match record {
            NodeRecord::Known(node) => Some(node),
            NodeRecord::Unrecognized(_) => None,
        })
    }

    /// Replace the store's graph with this record's content.
    ///
    /// The store is only touched once the whole record has been processed; id
    /// counters are recomputed from the imported ids.
    pub fn import_into(self, store: &mut GraphStore) -> ImportReport {
        let mut staging = GraphStore::new();
        let mut report = ImportReport::default();

        for record in self.nodes {
            match record {
                NodeRecord::Known(node) => {
                    let id = node.id.clone();
                    let kind = node.kind();
                    if staging.add_node(node).is_err() {
                        report.skip_node(Some(id.0), Some(kind.as_str().to_string()), SkipReason::DuplicateId);
                    } else {
                        report.imported_nodes += 1;
                    }
                }
                NodeRecord::Unrecognized(value) => {
                    let (id, node_type, reason) = diagnose_node(value);
                    report.skip_node(id, node_type, reason);
                }
            }
        }

        let mut seen = HashSet::new();
        for connection in self.connections {
            if !seen.insert(connection.id.clone()) {
                report.skip_connection(connection.id, ConnectionSkipReason::DuplicateId);
                continue;
            }
            let id = connection.id.clone();
            match staging.insert_connection(connection) {
                Ok(()) => report.imported_connections += 1,
                Err(rejection) => {
                    report.skip_connection(id, ConnectionSkipReason::Rejected(rejection))
                }
            }
        }

        let mut metadata = self.metadata;
        if let Some(entry) = &metadata.entry_node_id {
            if staging.node(entry).is_none() {
                warn!(entry = %entry, "entry node missing from import, cleared");
                report.dropped_entry_node = Some(entry.clone());
                metadata.entry_node_id = None;
            }
        }
        staging.replace_metadata(metadata);

        store.restore(staging.into_graph());

        info!(
            nodes = report.imported_nodes,
            connections = report.imported_connections,
            skipped_nodes = report.skipped_nodes.len(),
            skipped_connections = report.skipped_connections.len(),
            "graph imported"
        );
        report
    }
}

/// Work out why a node entry could not be read.
fn diagnose_node(value: serde_json::Value) -> (Option<String>, Option<String>, SkipReason) {
    let id = value.get("id").and_then(|v| v.as_str()).map(str::to_string);
    let node_type = value
        .get("type")
        .and_then(|v| v.as_str())
        .map(str::to_string);

    let reason = match node_type.as_deref().map(str::parse::<NodeKind>) {
        Some(Ok(_)) => match serde_json::from_value::<Node>(value) {
            Err(err) => SkipReason::Malformed(err.to_string()),
            Ok(_) => SkipReason::Malformed("unreadable node entry".to_string()),
        },
        Some(Err(())) => SkipReason::UnknownType,
        None => SkipReason::Malformed("missing node type".to_string()),
    };
    (id, node_type, reason)
}

/// Why a node entry was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The `type` discriminant names no known variant.
    UnknownType,
    /// The entry has a known type but could not be read.
    Malformed(String),
    /// Another entry already used this id.
    DuplicateId,
}

/// A node entry that was not imported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedNode {
    pub id: Option<String>,
    pub node_type: Option<String>,
    pub reason: SkipReason,
}

/// Why a connection entry was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionSkipReason {
    /// Endpoints missing or not an output/input pair.
    Rejected(ConnectionRejection),
    DuplicateId,
}

/// A connection entry that was not imported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedConnection {
    pub id: ConnectionId,
    pub reason: ConnectionSkipReason,
}

/// Outcome of an import.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImportReport {
    pub imported_nodes: usize,
    pub imported_connections: usize,
    pub skipped_nodes: Vec<SkippedNode>,
    pub skipped_connections: Vec<SkippedConnection>,
    /// Entry node named by the metadata that did not survive the import.
    pub dropped_entry_node: Option<NodeId>,
}

impl ImportReport {
    /// True when nothing had to be skipped.
    pub fn is_clean(&self) -> bool {
        self.skipped_nodes.is_empty()
            && self.skipped_connections.is_empty()
            && self.dropped_entry_node.is_none()
    }

    fn skip_node(&mut self, id: Option<String>, node_type: Option<String>, reason: SkipReason) {
        warn!(id = ?id, node_type = ?node_type, reason = ?reason, "node skipped on import");
        self.skipped_nodes.push(SkippedNode {
            id,
            node_type,
            reason,
        });
    }

    fn skip_connection(&mut self, id: ConnectionId, reason: ConnectionSkipReason) {
        warn!(connection = %id, reason = ?reason, "connection skipped on import");
        self.skipped_connections.push(SkippedConnection { id, reason });
    }
}
