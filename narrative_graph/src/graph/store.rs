//! Graph store - the only writer of the node and connection maps.

use std::collections::{BTreeSet, HashSet};
use thiserror::Error;
use tracing::debug;

use super::{
    Connection, ConnectionId, Graph, GraphMetadata, IdAllocator, Node, NodeId, PortId, Position,
    RemovedPorts,
};
use crate::error::{GraphError, Result};
use crate::nodes::{ChoicePatch, ChoiceOptionDraft, NodeKind, NodePatch, NodePayload, TriggerMode};

/// Why a connection attempt was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionRejection {
    #[error("node '{0}' does not exist")]
    MissingNode(NodeId),

    #[error("a node cannot connect to itself")]
    SelfLoop,

    #[error("port '{port_id}' is not an output of node '{node_id}'")]
    SourceNotOutput { node_id: NodeId, port_id: PortId },

    #[error("port '{port_id}' is not an input of node '{node_id}'")]
    TargetNotInput { node_id: NodeId, port_id: PortId },
}

/// What a delete removed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeleteOutcome {
    pub nodes: Vec<NodeId>,
    /// Explicitly named connections plus every connection touching a removed node.
    pub connections: Vec<ConnectionId>,
}

/// Result of a property edit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PropertyUpdate {
    /// Ports the edit removed from the node.
    pub removed_ports: RemovedPorts,
    /// Connections deleted because their port disappeared.
    pub removed_connections: Vec<ConnectionId>,
}

/// Owns the authoritative graph and the id counters.
///
/// Every mutation goes through a validated operation here, which keeps cascade
/// deletes and port bindings consistent.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    graph: Graph,
    ids: IdAllocator,
}

impl GraphStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing graph, deriving id counters from it.
    pub fn from_graph(graph: Graph) -> Self {
        let mut store = Self {
            graph,
            ids: IdAllocator::new(),
        };
        store.ids.recompute(&store.graph);
        store
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn ids(&self) -> &IdAllocator {
        &self.ids
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.graph.nodes.get(id)
    }

    pub fn connection(&self, id: &ConnectionId) -> Option<&Connection> {
        self.graph.connections.get(id)
    }

    pub fn node_count(&self) -> usize {
        self.graph.nodes.len()
    }

    pub fn connection_count(&self) -> usize {
        self.graph.connections.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.nodes.values()
    }

    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.graph.connections.values()
    }

    pub fn metadata(&self) -> &GraphMetadata {
        &self.graph.metadata
    }

    /// All connections touching a node.
    pub fn connections_of(&self, node_id: &NodeId) -> Vec<&Connection> {
        self.graph
            .connections
            .values()
            .filter(|c| c.involves_node(node_id))
            .collect()
    }

    /// Connections arriving at a node.
    pub fn incoming(&self, node_id: &NodeId) -> Vec<&Connection> {
        self.graph
            .connections
            .values()
            .filter(|c| &c.target_node_id == node_id)
            .collect()
    }

    /// Connections leaving a node.
    pub fn outgoing(&self, node_id: &NodeId) -> Vec<&Connection> {
        self.graph
            .connections
            .values()
            .filter(|c| &c.source_node_id == node_id)
            .collect()
    }

    /// Allocate a node id that no existing or future allocation will reuse.
    pub fn allocate_node_id(&mut self) -> NodeId {
        self.ids.next_node_id()
    }

    /// Create a node of `kind` with default payload at `position`.
    pub fn create_node(&mut self, kind: NodeKind, position: Position) -> NodeId {
        let id = self.ids.next_node_id();
        self.insert_node(Node::new(id.clone(), kind, position));
        id
    }

    /// Insert a node whose id was allocated by the caller.
    pub fn add_node(&mut self, mut node: Node) -> Result<NodeId> {
        if self.graph.nodes.contains_key(&node.id) {
            return Err(GraphError::DuplicateNode(node.id));
        }
        node.sync_ports();
        let id = node.id.clone();
        self.insert_node(node);
        Ok(id)
    }

    fn insert_node(&mut self, node: Node) {
        let id = node.id.clone();
        self.ids.observe_node(&id);
        debug!(node = %id, kind = %node.kind(), "node added");
        self.graph.nodes.insert(id, node);
        self.debug_check();
    }

    /// Check whether a connection between the two ports would be valid.
    pub fn check_connection(
        &self,
        source_node_id: &NodeId,
        source_port_id: &PortId,
        target_node_id: &NodeId,
        target_port_id: &PortId,
    ) -> std::result::Result<(), ConnectionRejection> {
        let source = self
            .graph
            .nodes
            .get(source_node_id)
            .ok_or_else(|| ConnectionRejection::MissingNode(source_node_id.clone()))?;
        let target = self
            .graph
            .nodes
            .get(target_node_id)
            .ok_or_else(|| ConnectionRejection::MissingNode(target_node_id.clone()))?;

        if source_node_id == target_node_id {
            return Err(ConnectionRejection::SelfLoop);
        }
        if !source.has_output(source_port_id) {
            return Err(ConnectionRejection::SourceNotOutput {
                node_id: source_node_id.clone(),
                port_id: source_port_id.clone(),
            });
        }
        if !target.has_input(target_port_id) {
            return Err(ConnectionRejection::TargetNotInput {
                node_id: target_node_id.clone(),
                port_id: target_port_id.clone(),
            });
        }
        Ok(())
    }

    /// Connect an output port to an input port.
    ///
    /// Invalid attempts are rejected silently: nothing changes and `None` is
    /// returned.
    pub fn create_connection(
        &mut self,
        source_node_id: &NodeId,
        source_port_id: &PortId,
        target_node_id: &NodeId,
        target_port_id: &PortId,
    ) -> Option<Connection> {
        if let Err(reason) =
            self.check_connection(source_node_id, source_port_id, target_node_id, target_port_id)
        {
            debug!(%reason, "connection rejected");
            return None;
        }

        let connection = Connection {
            id: self.ids.next_connection_id(),
            source_node_id: source_node_id.clone(),
            source_port_id: source_port_id.clone(),
            target_node_id: target_node_id.clone(),
            target_port_id: target_port_id.clone(),
        };
        self.graph
            .connections
            .insert(connection.id.clone(), connection.clone());
        self.debug_check();
        Some(connection)
    }

    /// Insert a connection read from a record, after validating it.
    pub(crate) fn insert_connection(
        &mut self,
        connection: Connection,
    ) -> std::result::Result<(), ConnectionRejection> {
        self.check_connection(
            &connection.source_node_id,
            &connection.source_port_id,
            &connection.target_node_id,
            &connection.target_port_id,
        )?;
        self.ids.observe_connection(&connection.id);
        self.graph
            .connections
            .insert(connection.id.clone(), connection);
        Ok(())
    }

    /// Remove one connection.
    pub fn delete_connection(&mut self, id: &ConnectionId) -> Result<Connection> {
        let connection = self
            .graph
            .connections
            .remove(id)
            .ok_or_else(|| GraphError::ConnectionNotFound(id.clone()))?;
        debug!(connection = %id, "connection deleted");
        Ok(connection)
    }

    /// Remove nodes (cascading to their connections) and named connections.
    ///
    /// Returns `None` without touching anything when no named id exists.
    pub fn delete_selected(
        &mut self,
        node_ids: &[NodeId],
        connection_ids: &[ConnectionId],
    ) -> Option<DeleteOutcome> {
        let nodes: BTreeSet<NodeId> = node_ids
            .iter()
            .filter(|id| self.graph.nodes.contains_key(*id))
            .cloned()
            .collect();

        let mut connections: BTreeSet<ConnectionId> = self
            .graph
            .connections
            .values()
            .filter(|c| nodes.contains(&c.source_node_id) || nodes.contains(&c.target_node_id))
            .map(|c| c.id.clone())
            .collect();
        connections.extend(
            connection_ids
                .iter()
                .filter(|id| self.graph.connections.contains_key(*id))
                .cloned(),
        );

        if nodes.is_empty() && connections.is_empty() {
            return None;
        }

        for id in &nodes {
            self.graph.nodes.remove(id);
        }
        for id in &connections {
            self.graph.connections.remove(id);
        }
        if let Some(entry) = &self.graph.metadata.entry_node_id {
            if nodes.contains(entry) {
                self.graph.metadata.entry_node_id = None;
            }
        }

        debug!(
            nodes = nodes.len(),
            connections = connections.len(),
            "selection deleted"
        );
        self.debug_check();
        Some(DeleteOutcome {
            nodes: nodes.into_iter().collect(),
            connections: connections.into_iter().collect(),
        })
    }

    /// Clone nodes under fresh ids, shifted by `offset`. Wiring is not copied.
    ///
    /// Returns the new ids in the order of the originals.
    pub fn duplicate_selected(&mut self, node_ids: &[NodeId], offset: Position) -> Vec<NodeId> {
        let mut seen = HashSet::new();
        let originals: Vec<Node> = node_ids
            .iter()
            .filter(|id| seen.insert((*id).clone()))
            .filter_map(|id| self.graph.nodes.get(id).cloned())
            .collect();

        let mut created = Vec::with_capacity(originals.len());
        for original in originals {
            let id = self.ids.next_node_id();
            self.graph
                .nodes
                .insert(id.clone(), original.duplicate(id.clone(), offset));
            created.push(id);
        }
        if !created.is_empty() {
            self.debug_check();
        }
        created
    }

    /// Shift several nodes by `delta`. Returns false if none of them exist.
    pub fn move_nodes(&mut self, node_ids: &[NodeId], delta: Position) -> bool {
        let mut moved = false;
        for id in node_ids {
            if let Some(node) = self.graph.nodes.get_mut(id) {
                node.position = node.position + delta;
                moved = true;
            }
        }
        moved
    }

    pub fn set_node_position(&mut self, node_id: &NodeId, position: Position) -> Result<()> {
        let node = self
            .graph
            .nodes
            .get_mut(node_id)
            .ok_or_else(|| GraphError::NodeNotFound(node_id.clone()))?;
        node.position = position;
        Ok(())
    }

    /// Apply a partial payload update, regenerating ports and pruning any
    /// connection bound to a port that went away.
    pub fn update_properties(&mut self, node_id: &NodeId, patch: NodePatch) -> Result<PropertyUpdate> {
        let node = self
            .graph
            .nodes
            .get_mut(node_id)
            .ok_or_else(|| GraphError::NodeNotFound(node_id.clone()))?;

        let found = node.kind();
        node.payload
            .apply(patch)
            .map_err(|patch| GraphError::PatchMismatch {
                node_id: node_id.clone(),
                expected: patch.kind(),
                found,
            })?;

        Ok(self.regenerate_ports(node_id))
    }

    /// Switch a timed-event node between scheduled and conditional activation.
    pub fn set_trigger_mode(&mut self, node_id: &NodeId, mode: TriggerMode) -> Result<PropertyUpdate> {
        let node = self
            .graph
            .nodes
            .get_mut(node_id)
            .ok_or_else(|| GraphError::NodeNotFound(node_id.clone()))?;
        if !node.payload.set_trigger_mode(mode) {
            return Err(GraphError::NotTimed(node_id.clone()));
        }
        Ok(self.regenerate_ports(node_id))
    }

    /// Append an option to a choice node. Returns the new option's port.
    pub fn add_choice_option(&mut self, node_id: &NodeId, text: &str) -> Result<PortId> {
        let node = self
            .graph
            .nodes
            .get_mut(node_id)
            .ok_or_else(|| GraphError::NodeNotFound(node_id.clone()))?;
        let found = node.kind();
        let NodePayload::Choice(choice) = &mut node.payload else {
            return Err(GraphError::PatchMismatch {
                node_id: node_id.clone(),
                expected: NodeKind::Choice,
                found,
            });
        };
        let port = choice.add_option(text);
        self.regenerate_ports(node_id);
        Ok(port)
    }

    /// Remove the option at `index` together with its port and connections.
    pub fn remove_choice_option(&mut self, node_id: &NodeId, index: usize) -> Result<PropertyUpdate> {
        let node = self
            .graph
            .nodes
            .get(node_id)
            .ok_or_else(|| GraphError::NodeNotFound(node_id.clone()))?;
        let found = node.kind();
        let NodePayload::Choice(choice) = &node.payload else {
            return Err(GraphError::PatchMismatch {
                node_id: node_id.clone(),
                expected: NodeKind::Choice,
                found,
            });
        };
        if index >= choice.options.len() {
            return Err(GraphError::OptionIndexOutOfRange {
                node_id: node_id.clone(),
                index,
            });
        }

        let mut drafts: Vec<ChoiceOptionDraft> =
            choice.options.iter().map(ChoiceOptionDraft::from).collect();
        drafts.remove(index);
        self.update_properties(
            node_id,
            NodePatch::Choice(ChoicePatch {
                options: Some(drafts),
            }),
        )
    }

    fn regenerate_ports(&mut self, node_id: &NodeId) -> PropertyUpdate {
        let Some(node) = self.graph.nodes.get_mut(node_id) else {
            return PropertyUpdate::default();
        };
        let removed_ports = node.sync_ports();

        let dangling: Vec<ConnectionId> = self
            .graph
            .connections
            .values()
            .filter(|c| {
                (&c.target_node_id == node_id && removed_ports.inputs.contains(&c.target_port_id))
                    || (&c.source_node_id == node_id
                        && removed_ports.outputs.contains(&c.source_port_id))
            })
            .map(|c| c.id.clone())
            .collect();
        for id in &dangling {
            self.graph.connections.remove(id);
        }

        if !removed_ports.is_empty() {
            debug!(
                node = %node_id,
                ports = removed_ports.len(),
                connections = dangling.len(),
                "ports regenerated"
            );
        }
        self.debug_check();
        PropertyUpdate {
            removed_ports,
            removed_connections: dangling,
        }
    }

    pub fn set_metadata(&mut self, metadata: GraphMetadata) -> Result<()> {
        if let Some(entry) = &metadata.entry_node_id {
            if !self.graph.nodes.contains_key(entry) {
                return Err(GraphError::NodeNotFound(entry.clone()));
            }
        }
        self.graph.metadata = metadata;
        Ok(())
    }

    /// Mark the node where narrative flow starts.
    pub fn set_entry_node(&mut self, node_id: Option<NodeId>) -> Result<()> {
        if let Some(id) = &node_id {
            if !self.graph.nodes.contains_key(id) {
                return Err(GraphError::NodeNotFound(id.clone()));
            }
        }
        self.graph.metadata.entry_node_id = node_id;
        Ok(())
    }

    /// Remove every node and connection. Metadata is kept.
    pub fn clear(&mut self) {
        self.graph.nodes.clear();
        self.graph.connections.clear();
        self.graph.metadata.entry_node_id = None;
    }

    /// Independent deep copy of the current graph.
    pub fn snapshot(&self) -> Graph {
        self.graph.clone()
    }

    /// Replace the graph wholesale and recompute id counters.
    pub fn restore(&mut self, graph: Graph) {
        self.graph = graph;
        self.ids.recompute(&self.graph);
        self.debug_check();
    }

    pub fn into_graph(self) -> Graph {
        self.graph
    }

    pub(crate) fn replace_metadata(&mut self, metadata: GraphMetadata) {
        self.graph.metadata = metadata;
    }

    fn debug_check(&self) {
        debug_assert!(
            self.graph.validate().is_ok(),
            "graph invariant broken: {:?}",
            self.graph.validate()
        );
    }
}
