//! Change notification for hosts (dirty tracking, panel refresh).

use crate::graph::{ConnectionId, DeleteOutcome, NodeId};

/// A committed change to the graph.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphChange {
    NodesAdded(Vec<NodeId>),
    NodesMoved(Vec<NodeId>),
    ConnectionAdded(ConnectionId),
    Deleted(DeleteOutcome),
    /// Payload edit, trigger-mode toggle or choice option edit.
    PropertiesUpdated {
        node_id: NodeId,
        removed_connections: Vec<ConnectionId>,
    },
    MetadataChanged,
    Cleared,
    Imported,
    Undo,
    Redo,
}

impl GraphChange {
    /// Short name used in log lines.
    pub fn name(&self) -> &'static str {
        match self {
            GraphChange::NodesAdded(_) => "nodes_added",
            GraphChange::NodesMoved(_) => "nodes_moved",
            GraphChange::ConnectionAdded(_) => "connection_added",
            GraphChange::Deleted(_) => "deleted",
            GraphChange::PropertiesUpdated { .. } => "properties_updated",
            GraphChange::MetadataChanged => "metadata_changed",
            GraphChange::Cleared => "cleared",
            GraphChange::Imported => "imported",
            GraphChange::Undo => "undo",
            GraphChange::Redo => "redo",
        }
    }
}

/// Handle returned by [`ChangeNotifier::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&GraphChange)>;

/// Listeners called after every committed mutation, in subscription order.
#[derive(Default)]
pub struct ChangeNotifier {
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&GraphChange) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn notify(&mut self, change: &GraphChange) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(change);
        }
    }
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
