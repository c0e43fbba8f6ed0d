//! Snapshot-based undo/redo history.
//!
//! The history keeps full copies of the graph. The entry at `index` always
//! equals the live graph; undo and redo move the index and hand back the
//! snapshot to restore.

use std::collections::VecDeque;
use tracing::debug;

use crate::graph::Graph;

/// Default number of undo steps kept.
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Bounded list of graph snapshots with a cursor.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: VecDeque<Graph>,
    index: usize,
    /// Maximum number of undo steps. One extra slot holds the baseline.
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl History {
    /// Create a history holding an empty graph as its baseline.
    pub fn new(capacity: usize) -> Self {
        let mut snapshots = VecDeque::new();
        snapshots.push_back(Graph::default());
        Self {
            snapshots,
            index: 0,
            capacity: capacity.max(1),
        }
    }

    /// Drop all entries and start over from `baseline`.
    pub fn reset(&mut self, baseline: Graph) {
        self.snapshots.clear();
        self.snapshots.push_back(baseline);
        self.index = 0;
    }

    /// Record the state after a mutation.
    ///
    /// Entries after the cursor (an abandoned redo branch) are discarded first.
    /// When the cap is exceeded the oldest entry is evicted.
    pub fn record(&mut self, snapshot: Graph) {
        self.snapshots.truncate(self.index + 1);
        self.snapshots.push_back(snapshot);

        while self.snapshots.len() > self.capacity + 1 {
            self.snapshots.pop_front();
        }
        self.index = self.snapshots.len() - 1;
    }

    /// Step back. Returns the snapshot to restore, or `None` at the oldest entry.
    pub fn undo(&mut self) -> Option<&Graph> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        debug!(index = self.index, "undo");
        self.snapshots.get(self.index)
    }

    /// Step forward. Returns the snapshot to restore, or `None` at the newest entry.
    pub fn redo(&mut self) -> Option<&Graph> {
        if self.index + 1 >= self.snapshots.len() {
            return None;
        }
        self.index += 1;
        debug!(index = self.index, "redo");
        self.snapshots.get(self.index)
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.snapshots.len()
    }

    /// Number of snapshots held, baseline included.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Snapshot under the cursor.
    pub fn current(&self) -> Option<&Graph> {
        self.snapshots.get(self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titled(title: &str) -> Graph {
        let mut graph = Graph::default();
        graph.metadata.title = title.to_string();
        graph
    }

    #[test]
    fn test_undo_redo_walks_snapshots() {
        let mut history = History::new(10);
        history.record(titled("a"));
        history.record(titled("b"));

        assert_eq!(history.undo().unwrap().metadata.title, "a");
        assert_eq!(history.undo().unwrap().metadata.title, "");
        assert!(history.undo().is_none());

        assert_eq!(history.redo().unwrap().metadata.title, "a");
        assert_eq!(history.redo().unwrap().metadata.title, "b");
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_record_discards_redo_branch() {
        let mut history = History::new(10);
        history.record(titled("a"));
        history.record(titled("b"));
        history.undo();

        history.record(titled("c"));

        assert!(!history.can_redo());
        assert_eq!(history.len(), 3);
        assert_eq!(history.undo().unwrap().metadata.title, "a");
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut history = History::new(3);
        for i in 0..10 {
            history.record(titled(&i.to_string()));
        }

        assert_eq!(history.len(), 4);
        assert_eq!(history.index(), 3);

        let mut steps = 0;
        while history.undo().is_some() {
            steps += 1;
        }
        assert_eq!(steps, 3);
        assert_eq!(history.current().unwrap().metadata.title, "6");
    }

    #[test]
    fn test_default_cap_keeps_fifty_steps() {
        let mut history = History::default();
        for i in 0..DEFAULT_HISTORY_CAPACITY {
            history.record(titled(&i.to_string()));
        }

        let mut steps = 0;
        while history.undo().is_some() {
            steps += 1;
        }
        assert_eq!(steps, DEFAULT_HISTORY_CAPACITY);
        assert_eq!(history.current().unwrap().metadata.title, "");
    }

    #[test]
    fn test_reset() {
        let mut history = History::new(5);
        history.record(titled("a"));
        history.reset(titled("imported"));

        assert_eq!(history.len(), 1);
        assert!(!history.can_undo());
        assert_eq!(history.current().unwrap().metadata.title, "imported");
    }
}
