//! Identifiers for nodes, ports and connections, and the allocator that hands
//! out fresh ones.

use serde::{Deserialize, Serialize};

use super::Graph;

/// Numeric part after the last '-' of an id such as `node-12`.
///
/// `u64::MAX` does not count: no counter can move past it.
fn numeric_suffix(id: &str) -> Option<u64> {
    id.rsplit_once('-')
        .and_then(|(_, suffix)| suffix.parse::<u64>().ok())
        .filter(|n| *n < u64::MAX)
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Numeric suffix of the id, if it has one.
            pub fn numeric_suffix(&self) -> Option<u64> {
                numeric_suffix(&self.0)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

string_id!(
    /// Unique identifier of a node within a graph.
    NodeId
);

string_id!(
    /// Identifier of a port, unique within its owning node only.
    PortId
);

string_id!(
    /// Unique identifier of a connection within a graph.
    ConnectionId
);

/// Hands out `node-N` and `conn-N` ids from monotonically increasing counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdAllocator {
    next_node: u64,
    next_connection: u64,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self {
            next_node: 1,
            next_connection: 1,
        }
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh node id.
    pub fn next_node_id(&mut self) -> NodeId {
        let id = NodeId(format!("node-{}", self.next_node));
        self.next_node = self.next_node.saturating_add(1);
        id
    }

    /// Allocate a fresh connection id.
    pub fn next_connection_id(&mut self) -> ConnectionId {
        let id = ConnectionId(format!("conn-{}", self.next_connection));
        self.next_connection = self.next_connection.saturating_add(1);
        id
    }

    /// Counter value the next node id will use.
    pub fn peek_node(&self) -> u64 {
        self.next_node
    }

    /// Counter value the next connection id will use.
    pub fn peek_connection(&self) -> u64 {
        self.next_connection
    }

    /// Make sure a node id inserted from outside is never allocated again.
    pub fn observe_node(&mut self, id: &NodeId) {
        if let Some(suffix) = id.numeric_suffix() {
            self.next_node = self.next_node.max(suffix.saturating_add(1));
        }
    }

    /// Make sure a connection id inserted from outside is never allocated again.
    pub fn observe_connection(&mut self, id: &ConnectionId) {
        if let Some(suffix) = id.numeric_suffix() {
            self.next_connection = self.next_connection.max(suffix.saturating_add(1));
        }
    }

    /// Reset both counters to `max(numeric suffix) + 1` over the ids in `graph`.
    ///
    /// Ids without a numeric suffix do not take part.
    pub fn recompute(&mut self, graph: &Graph) {
        let max_node = graph
            .nodes
            .keys()
            .filter_map(NodeId::numeric_suffix)
            .max()
            .unwrap_or(0);
        let max_connection = graph
            .connections
            .keys()
            .filter_map(ConnectionId::numeric_suffix)
            .max()
            .unwrap_or(0);

        self.next_node = max_node.saturating_add(1);
        self.next_connection = max_connection.saturating_add(1);
    }
}

/// Allocate the next `<prefix>-N` id not already present in `existing`.
pub(crate) fn next_local_port_id<'a>(
    prefix: &str,
    existing: impl IntoIterator<Item = &'a PortId>,
) -> PortId {
    let next = existing
        .into_iter()
        .filter(|id| {
            id.0.rsplit_once('-')
                .map(|(head, _)| head == prefix)
                .unwrap_or(false)
        })
        .filter_map(PortId::numeric_suffix)
        .max()
        .unwrap_or(0)
        .saturating_add(1);
    PortId(format!("{}-{}", prefix, next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Node, Position};
    use crate::nodes::NodeKind;

    #[test]
    fn test_numeric_suffix() {
        assert_eq!(NodeId::from("node-7").numeric_suffix(), Some(7));
        assert_eq!(NodeId::from("intro-scene-12").numeric_suffix(), Some(12));
        assert_eq!(NodeId::from("intro").numeric_suffix(), None);
        assert_eq!(NodeId::from("node-x").numeric_suffix(), None);
        assert_eq!(NodeId::from("node-18446744073709551615").numeric_suffix(), None);
    }

    #[test]
    fn test_allocator_is_monotonic() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.next_node_id().as_str(), "node-1");
        assert_eq!(ids.next_node_id().as_str(), "node-2");
        assert_eq!(ids.next_connection_id().as_str(), "conn-1");
        assert_eq!(ids.peek_node(), 3);
    }

    #[test]
    fn test_next_local_port_id() {
        let ports = vec![PortId::from("option-1"), PortId::from("option-4"), PortId::from("in")];
        assert_eq!(next_local_port_id("option", &ports).as_str(), "option-5");
        assert_eq!(next_local_port_id("option", &Vec::<PortId>::new()).as_str(), "option-1");
    }

    #[test]
    fn test_suffix_at_counter_limit_is_ignored() {
        let mut ids = IdAllocator::new();
        ids.observe_node(&NodeId::from("node-18446744073709551615"));
        ids.observe_connection(&ConnectionId::from("conn-18446744073709551614"));
        assert_eq!(ids.peek_node(), 1);
        assert_eq!(ids.peek_connection(), u64::MAX);

        let mut graph = Graph::default();
        let id = NodeId::from("node-18446744073709551615");
        graph.nodes.insert(
            id.clone(),
            Node::new(id, NodeKind::Dialogue, Position::default()),
        );
        ids.recompute(&graph);
        assert_eq!(ids.peek_node(), 1);
        assert_eq!(ids.next_node_id().as_str(), "node-1");
    }

    #[test]
    fn test_ids_serialize_as_plain_strings() {
        let json = serde_json::to_string(&NodeId::from("node-3")).unwrap();
        assert_eq!(json, "\"node-3\"");
    }
}
