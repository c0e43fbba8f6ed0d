//! Editor facade - the single entry point for hosts.
//!
//! The editor owns the graph store, the undo history, the selection and the
//! gesture controller. Every committed mutation:
//! 1. records exactly one history snapshot
//! 2. raises a render request (pulled with [`Editor::take_render_request`])
//! 3. notifies change subscribers
//!
//! Undo, redo and import replace the graph without recording.

mod controller;
mod keyboard;
mod quick_add;
mod selection;

pub use controller::*;
pub use keyboard::*;
pub use quick_add::*;
pub use selection::*;

use tracing::debug;

use crate::config::EditorConfig;
use crate::error::{RecordError, Result};
use crate::events::{ChangeNotifier, GraphChange, SubscriptionId};
use crate::geometry::port_position;
use crate::graph::{
    Connection, ConnectionId, DeleteOutcome, Graph, GraphMetadata, GraphStore, Node, NodeId,
    PortId, PortSide, Position, PropertyUpdate,
};
use crate::history::History;
use crate::nodes::{NodeKind, NodePatch, NodePayload, TriggerMode};
use crate::record::{GraphRecord, ImportReport};

#[derive(Debug)]
pub struct Editor {
    store: GraphStore,
    history: History,
    selection: Selection,
    controller: InteractionController,
    notifier: ChangeNotifier,
    config: EditorConfig,
    render_requested: bool,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    /// Create an editor with an empty graph.
    pub fn new(config: EditorConfig) -> Self {
        let store = GraphStore::new();
        let mut history = History::new(config.history_capacity);
        history.reset(store.snapshot());
        Self {
            store,
            history,
            selection: Selection::new(),
            controller: InteractionController::new(),
            notifier: ChangeNotifier::new(),
            config,
            render_requested: true,
        }
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn graph(&self) -> &Graph {
        self.store.graph()
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.store.node(id)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn gesture(&self) -> &GestureState {
        self.controller.state()
    }

    pub fn quick_add(&self) -> Option<&QuickAddMenu> {
        self.controller.quick_add()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&GraphChange) + 'static) -> SubscriptionId {
        self.notifier.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    /// Return and clear the pending render request.
    pub fn take_render_request(&mut self) -> bool {
        std::mem::take(&mut self.render_requested)
    }

    pub fn request_render(&mut self) {
        self.render_requested = true;
    }

    fn commit(&mut self, change: GraphChange) {
        self.history.record(self.store.snapshot());
        debug!(change = change.name(), history = self.history.index(), "change committed");
        self.render_requested = true;
        self.notifier.notify(&change);
    }

    // --- graph mutations ---

    /// Insert a node whose id was allocated through [`Editor::allocate_node_id`].
    pub fn add_node(&mut self, node: Node) -> Result<NodeId> {
        let id = self.store.add_node(node)?;
        self.commit(GraphChange::NodesAdded(vec![id.clone()]));
        Ok(id)
    }

    pub fn allocate_node_id(&mut self) -> NodeId {
        self.store.allocate_node_id()
    }

    /// Create a node of `kind` with default payload.
    pub fn create_node(&mut self, kind: NodeKind, position: Position) -> NodeId {
        let id = self.store.create_node(kind, position);
        self.commit(GraphChange::NodesAdded(vec![id.clone()]));
        id
    }

    /// Connect two ports. Invalid attempts change nothing and return `None`.
    pub fn connect(
        &mut self,
        source_node_id: &NodeId,
        source_port_id: &PortId,
        target_node_id: &NodeId,
        target_port_id: &PortId,
    ) -> Option<Connection> {
        let connection = self.store.create_connection(
            source_node_id,
            source_port_id,
            target_node_id,
            target_port_id,
        )?;
        self.commit(GraphChange::ConnectionAdded(connection.id.clone()));
        Some(connection)
    }

    /// Delete nodes (with their connections) and connections by id.
    pub fn delete(&mut self, node_ids: &[NodeId], connection_ids: &[ConnectionId]) -> Option<DeleteOutcome> {
        let outcome = self.store.delete_selected(node_ids, connection_ids)?;
        self.selection.retain_existing(self.store.graph());
        self.commit(GraphChange::Deleted(outcome.clone()));
        Some(outcome)
    }

    pub fn delete_selection(&mut self) -> Option<DeleteOutcome> {
        let nodes = self.selection.nodes().to_vec();
        let connections = self.selection.connections().to_vec();
        self.delete(&nodes, &connections)
    }

    /// Duplicate the selected nodes. The copies become the new selection.
    pub fn duplicate_selection(&mut self) -> Vec<NodeId> {
        let nodes = self.selection.nodes().to_vec();
        let copies = self
            .store
            .duplicate_selected(&nodes, self.config.duplicate_offset);
        if copies.is_empty() {
            return copies;
        }
        self.selection.set_nodes(copies.iter().cloned());
        self.commit(GraphChange::NodesAdded(copies.clone()));
        copies
    }

    /// Move nodes by `delta` as one committed step.
    pub fn move_nodes(&mut self, node_ids: &[NodeId], delta: Position) -> bool {
        if delta == Position::default() || !self.store.move_nodes(node_ids, delta) {
            return false;
        }
        self.commit(GraphChange::NodesMoved(node_ids.to_vec()));
        true
    }

    /// Apply a property-panel patch. A patch that changes nothing is not
    /// recorded.
    pub fn update_properties(&mut self, node_id: &NodeId, patch: NodePatch) -> Result<PropertyUpdate> {
        let before = self.store.node(node_id).cloned();
        let update = self.store.update_properties(node_id, patch)?;
        if self.store.node(node_id) != before.as_ref() {
            self.after_property_edit(node_id, &update);
        }
        Ok(update)
    }

    /// Switch a timed node's trigger mode. Setting the current mode is not
    /// recorded.
    pub fn set_trigger_mode(&mut self, node_id: &NodeId, mode: TriggerMode) -> Result<PropertyUpdate> {
        let before = self.store.node(node_id).map(Node::trigger_mode);
        let update = self.store.set_trigger_mode(node_id, mode)?;
        if before != Some(Some(mode)) {
            self.after_property_edit(node_id, &update);
        }
        Ok(update)
    }

    pub fn add_choice_option(&mut self, node_id: &NodeId, text: &str) -> Result<PortId> {
        let port = self.store.add_choice_option(node_id, text)?;
        self.after_property_edit(node_id, &PropertyUpdate::default());
        Ok(port)
    }

    pub fn remove_choice_option(&mut self, node_id: &NodeId, index: usize) -> Result<PropertyUpdate> {
        let update = self.store.remove_choice_option(node_id, index)?;
        self.after_property_edit(node_id, &update);
        Ok(update)
    }

    fn after_property_edit(&mut self, node_id: &NodeId, update: &PropertyUpdate) {
        if !update.removed_connections.is_empty() {
            self.selection.retain_existing(self.store.graph());
        }
        self.commit(GraphChange::PropertiesUpdated {
            node_id: node_id.clone(),
            removed_connections: update.removed_connections.clone(),
        });
    }

    pub fn set_metadata(&mut self, metadata: GraphMetadata) -> Result<()> {
        self.store.set_metadata(metadata)?;
        self.commit(GraphChange::MetadataChanged);
        Ok(())
    }

    pub fn set_entry_node(&mut self, node_id: Option<NodeId>) -> Result<()> {
        self.store.set_entry_node(node_id)?;
        self.commit(GraphChange::MetadataChanged);
        Ok(())
    }

    /// Remove every node and connection.
    pub fn clear(&mut self) {
        self.controller.reset();
        self.selection.clear();
        self.store.clear();
        self.commit(GraphChange::Cleared);
    }

    // --- history ---

    /// Step back one snapshot. Returns false at the oldest entry.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo().cloned() else {
            return false;
        };
        self.apply_snapshot(snapshot, GraphChange::Undo);
        true
    }

    /// Step forward one snapshot. Returns false at the newest entry.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo().cloned() else {
            return false;
        };
        self.apply_snapshot(snapshot, GraphChange::Redo);
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn apply_snapshot(&mut self, snapshot: Graph, change: GraphChange) {
        self.controller.reset();
        self.store.restore(snapshot);
        self.selection.retain_existing(self.store.graph());
        self.render_requested = true;
        self.notifier.notify(&change);
    }

    // --- records ---

    pub fn export(&self) -> GraphRecord {
        GraphRecord::from_store(&self.store)
    }

    pub fn export_json(&self) -> std::result::Result<String, RecordError> {
        self.export().to_json_string_pretty()
    }

    /// Replace the graph with a record. History restarts from the imported graph.
    pub fn import(&mut self, record: GraphRecord) -> ImportReport {
        self.controller.reset();
        self.selection.clear();
        let report = record.import_into(&mut self.store);
        self.history.reset(self.store.snapshot());
        self.render_requested = true;
        self.notifier.notify(&GraphChange::Imported);
        report
    }

    pub fn import_json(&mut self, json: &str) -> std::result::Result<ImportReport, RecordError> {
        let record = GraphRecord::from_json_str(json)?;
        Ok(self.import(record))
    }

    // --- selection ---

    pub fn select_node(&mut self, id: NodeId, additive: bool) {
        if self.store.node(&id).is_some() {
            self.selection.select_node(id, additive);
            self.render_requested = true;
        }
    }

    pub fn select_connection(&mut self, id: ConnectionId, additive: bool) {
        if self.store.connection(&id).is_some() {
            self.selection.select_connection(id, additive);
            self.render_requested = true;
        }
    }

    /// Select every node.
    pub fn select_all(&mut self) {
        self.selection.set_nodes(self.store.graph().sorted_node_ids());
        self.render_requested = true;
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.render_requested = true;
    }

    // --- pointer and keyboard ---

    pub fn pointer_down(&mut self, point: Position, modifiers: Modifiers) {
        let action = self.controller.pointer_down(
            self.store.graph(),
            &self.config,
            &mut self.selection,
            point,
            modifiers,
        );
        self.render_requested = true;
        if let Some(action) = action {
            self.apply_gesture(action);
        }
    }

    pub fn pointer_move(&mut self, point: Position) {
        if self.controller.is_idle() {
            return;
        }
        let action = self.controller.pointer_move(&self.config, point);
        self.render_requested = true;
        if let Some(action) = action {
            self.apply_gesture(action);
        }
    }

    pub fn pointer_up(&mut self, point: Position) {
        let action = self
            .controller
            .pointer_up(self.store.graph(), &self.config, point);
        self.render_requested = true;
        if let Some(action) = action {
            self.apply_gesture(action);
        }
    }

    /// Abandon the gesture in progress without touching history.
    pub fn cancel_gesture(&mut self) {
        if let Some(action) = self.controller.cancel() {
            self.apply_gesture(action);
        }
        self.render_requested = true;
    }

    /// Handle a key press. Returns true if the key did something.
    pub fn key(&mut self, key: EditorKey, text_input_focused: bool) -> bool {
        let menu_open = self.controller.quick_add().is_some();
        let Some(command) = resolve_key(key, text_input_focused, menu_open) else {
            return false;
        };
        debug!(?key, ?command, "key command");

        match command {
            KeyCommand::DeleteSelection => {
                self.delete_selection();
            }
            KeyCommand::Cancel => {
                self.cancel_gesture();
                self.clear_selection();
            }
            KeyCommand::SelectAll => self.select_all(),
            KeyCommand::Duplicate => {
                self.duplicate_selection();
            }
            KeyCommand::Undo => {
                self.undo();
            }
            KeyCommand::Redo => {
                self.redo();
            }
            KeyCommand::MenuUp => self.controller.menu_up(),
            KeyCommand::MenuDown => self.controller.menu_down(),
            KeyCommand::MenuConfirm => {
                if let Some(action) = self.controller.menu_confirm() {
                    self.apply_gesture(action);
                }
            }
            KeyCommand::MenuClose => self.controller.reset(),
        }
        self.render_requested = true;
        true
    }

    fn apply_gesture(&mut self, action: GestureAction) {
        match action {
            GestureAction::MoveNodes { node_ids, delta } => {
                self.store.move_nodes(&node_ids, delta);
            }
            GestureAction::CommitDrag {
                node_ids,
                delta,
                total,
            } => {
                self.store.move_nodes(&node_ids, delta);
                if total != Position::default() {
                    self.commit(GraphChange::NodesMoved(node_ids));
                }
            }
            GestureAction::Connect { source, target } => {
                self.connect(
                    &source.node_id,
                    &source.port_id,
                    &target.node_id,
                    &target.port_id,
                );
            }
            GestureAction::CreateWired {
                kind,
                position,
                origin,
            } => {
                self.create_wired(kind, position, origin);
            }
        }
    }

    /// Create a node from the quick-add menu, wired to the dangling port.
    ///
    /// The node is placed so that its wired port sits at `anchor`. Timed events
    /// created downstream of an output start in conditional mode so they have
    /// an input to connect.
    fn create_wired(&mut self, kind: NodeKind, anchor: Position, origin: PortRef) -> Option<NodeId> {
        self.store.node(&origin.node_id)?;

        let mut payload = NodePayload::default_for(kind);
        if origin.side == PortSide::Output {
            payload.set_trigger_mode(TriggerMode::Conditional);
        }
        let id = self.store.allocate_node_id();
        let mut node = Node::with_payload(id.clone(), anchor, payload);

        let wired_side = origin.side.opposite();
        let port_offset = port_position(&node, wired_side, 0, &self.config.layout) - node.position;
        node.position = anchor - port_offset;
        let wired_port = match wired_side {
            PortSide::Input => node.inputs.first(),
            PortSide::Output => node.outputs.first(),
        }
        .map(|port| port.id.clone());

        self.store.add_node(node).ok()?;
        let connection = wired_port.and_then(|port| match origin.side {
            PortSide::Output => {
                self.store
                    .create_connection(&origin.node_id, &origin.port_id, &id, &port)
            }
            PortSide::Input => {
                self.store
                    .create_connection(&id, &port, &origin.node_id, &origin.port_id)
            }
        });
        debug!(node = %id, %kind, wired = connection.is_some(), "quick-add node created");

        self.selection.select_node(id.clone(), false);
        self.commit(GraphChange::NodesAdded(vec![id.clone()]));
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::port_anchor;
    use crate::nodes::{ChoiceData, DialoguePatch};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn port(id: &str) -> PortId {
        PortId::from(id)
    }

    /// Dialogue node-1 at (0,0) and node-2 at (400,0), not connected.
    fn editor_with_two_nodes() -> Editor {
        let mut editor = Editor::default();
        editor.create_node(NodeKind::Dialogue, Position::new(0.0, 0.0));
        editor.create_node(NodeKind::Dialogue, Position::new(400.0, 0.0));
        editor
    }

    #[test]
    fn test_each_mutation_records_one_snapshot() {
        let mut editor = Editor::default();
        assert_eq!(editor.history().len(), 1);

        let a = editor.create_node(NodeKind::Dialogue, Position::default());
        let b = editor.create_node(NodeKind::Effect, Position::new(300.0, 0.0));
        editor.connect(&a, &port("out"), &b, &port("in")).unwrap();
        assert_eq!(editor.history().len(), 4);

        // rejected gesture: no snapshot
        assert!(editor.connect(&b, &port("in"), &a, &port("out")).is_none());
        assert!(editor.connect(&a, &port("out"), &a, &port("in")).is_none());
        assert_eq!(editor.history().len(), 4);
    }

    #[test]
    fn test_undo_redo_symmetry() {
        let mut editor = Editor::default();
        let before = editor.graph().clone();

        let a = editor.create_node(NodeKind::Dialogue, Position::default());
        let choice_id = editor.allocate_node_id();
        let choice = editor
            .add_node(Node::with_payload(
                choice_id,
                Position::new(250.0, 0.0),
                NodePayload::Choice(ChoiceData::with_options(["Agree", "Refuse"])),
            ))
            .unwrap();
        editor.connect(&a, &port("out"), &choice, &port("in")).unwrap();
        editor.add_choice_option(&choice, "Stay quiet").unwrap();
        editor.select_node(a.clone(), false);
        editor.duplicate_selection();
        editor.move_nodes(&[a.clone()], Position::new(10.0, 10.0));
        editor.remove_choice_option(&choice, 0).unwrap();
        editor.delete(&[a], &[]);
        let after = editor.graph().clone();

        let steps = editor.history().index();
        assert_eq!(steps, 8);
        for _ in 0..steps {
            assert!(editor.undo());
        }
        assert!(!editor.undo());
        assert_eq!(editor.graph(), &before);

        for _ in 0..steps {
            assert!(editor.redo());
        }
        assert!(!editor.redo());
        assert_eq!(editor.graph(), &after);
    }

    #[test]
    fn test_fifty_mutations_fully_undoable() {
        let mut editor = Editor::default();
        let before = editor.graph().clone();
        for i in 0..50 {
            editor.create_node(NodeKind::Effect, Position::new(i as f64 * 10.0, 0.0));
        }
        let after = editor.graph().clone();

        for _ in 0..50 {
            assert!(editor.undo());
        }
        assert_eq!(editor.graph(), &before);
        for _ in 0..50 {
            assert!(editor.redo());
        }
        assert_eq!(editor.graph(), &after);
    }

    #[test]
    fn test_history_cap_evicts_oldest() {
        let config = EditorConfig {
            history_capacity: 3,
            ..Default::default()
        };
        let mut editor = Editor::new(config);
        for _ in 0..6 {
            editor.create_node(NodeKind::Dialogue, Position::default());
        }

        let mut undone = 0;
        while editor.undo() {
            undone += 1;
        }
        assert_eq!(undone, 3);
        assert_eq!(editor.store().node_count(), 3);
    }

    #[test]
    fn test_new_mutation_after_undo_drops_redo() {
        let mut editor = Editor::default();
        editor.create_node(NodeKind::Dialogue, Position::default());
        editor.create_node(NodeKind::Dialogue, Position::default());
        editor.undo();
        assert!(editor.can_redo());

        let id = editor.create_node(NodeKind::Task, Position::default());
        assert!(!editor.can_redo());
        // counters follow the restored graph
        assert_eq!(id.as_str(), "node-2");
    }

    #[test]
    fn test_undo_prunes_selection_and_notifies() {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let mut editor = Editor::default();
        let sink = Rc::clone(&changes);
        editor.subscribe(move |change| sink.borrow_mut().push(change.name()));

        let id = editor.create_node(NodeKind::Dialogue, Position::default());
        editor.select_node(id, false);
        editor.undo();

        assert!(editor.selection().is_empty());
        assert_eq!(*changes.borrow(), vec!["nodes_added", "undo"]);
    }

    #[test]
    fn test_render_request_is_pulled_once() {
        let mut editor = Editor::default();
        assert!(editor.take_render_request());
        assert!(!editor.take_render_request());

        editor.create_node(NodeKind::Email, Position::default());
        assert!(editor.take_render_request());
        assert!(!editor.take_render_request());
    }

    #[test]
    fn test_drag_commits_one_snapshot() {
        let mut editor = editor_with_two_nodes();
        let recorded = editor.history().len();

        editor.pointer_down(Position::new(50.0, 10.0), Modifiers::default());
        editor.pointer_move(Position::new(60.0, 20.0));
        editor.pointer_move(Position::new(90.0, 30.0));
        assert_eq!(editor.history().len(), recorded);
        editor.pointer_up(Position::new(100.0, 30.0));

        assert_eq!(editor.history().len(), recorded + 1);
        assert_eq!(
            editor.node(&NodeId::from("node-1")).unwrap().position,
            Position::new(50.0, 20.0)
        );

        editor.undo();
        assert_eq!(
            editor.node(&NodeId::from("node-1")).unwrap().position,
            Position::new(0.0, 0.0)
        );
    }

    #[test]
    fn test_click_without_move_records_nothing() {
        let mut editor = editor_with_two_nodes();
        let recorded = editor.history().len();
        editor.pointer_down(Position::new(50.0, 10.0), Modifiers::default());
        editor.pointer_up(Position::new(50.0, 10.0));
        assert_eq!(editor.history().len(), recorded);
        assert_eq!(editor.selection().nodes(), &[NodeId::from("node-1")]);
    }

    #[test]
    fn test_escape_during_drag_restores_positions() {
        let mut editor = editor_with_two_nodes();
        let before = editor.graph().clone();
        let recorded = editor.history().len();

        editor.pointer_down(Position::new(50.0, 10.0), Modifiers::default());
        editor.pointer_move(Position::new(120.0, 60.0));
        assert!(editor.key(EditorKey::Escape, false));

        assert_eq!(editor.graph(), &before);
        assert_eq!(editor.history().len(), recorded);
        assert!(editor.selection().is_empty());
        assert!(editor.controller.is_idle());
    }

    #[test]
    fn test_connection_gesture_creates_connection() {
        let mut editor = editor_with_two_nodes();
        editor.pointer_down(Position::new(200.0, 40.0), Modifiers::default());
        editor.pointer_up(Position::new(401.0, 40.0));

        assert_eq!(editor.store().connection_count(), 1);
        let conn = editor.store().connections().next().unwrap();
        assert_eq!(conn.source_node_id, NodeId::from("node-1"));
        assert_eq!(conn.target_node_id, NodeId::from("node-2"));
    }

    #[test]
    fn test_quick_add_wires_new_node_to_dangling_output() {
        let mut editor = editor_with_two_nodes();
        let drop = Position::new(250.0, 300.0);

        editor.pointer_down(Position::new(200.0, 40.0), Modifiers::default());
        editor.pointer_up(drop);
        assert!(editor.quick_add().is_some());
        assert_eq!(editor.store().node_count(), 2);

        // pick "Meeting" from the keyboard: five steps down from Dialogue
        for _ in 0..5 {
            assert!(editor.key(EditorKey::ArrowDown, false));
        }
        assert!(editor.key(EditorKey::Enter, false));

        assert!(editor.quick_add().is_none());
        assert_eq!(editor.store().node_count(), 3);
        let created = NodeId::from("node-3");
        let node = editor.node(&created).unwrap();
        assert_eq!(node.kind(), NodeKind::Meeting);
        assert_eq!(node.trigger_mode(), Some(TriggerMode::Conditional));
        assert_eq!(
            port_anchor(node, &port("in"), &editor.config().layout),
            Some(drop)
        );

        let incoming = editor.store().incoming(&created);
        assert_eq!(incoming.len(), 1);
        assert_eq!(incoming[0].source_node_id, NodeId::from("node-1"));
        assert_eq!(editor.selection().nodes(), &[created]);
    }

    #[test]
    fn test_quick_add_from_input_wires_new_node_as_source() {
        let mut editor = editor_with_two_nodes();
        editor.pointer_down(Position::new(400.0, 40.0), Modifiers::default());
        editor.pointer_up(Position::new(300.0, 400.0));

        // second entry is Choice
        let menu_origin = editor.quick_add().unwrap().anchor;
        editor.pointer_down(
            menu_origin + Position::new(10.0, 24.0 * 1.5),
            Modifiers::default(),
        );

        let created = NodeId::from("node-3");
        assert_eq!(editor.node(&created).unwrap().kind(), NodeKind::Choice);
        let outgoing = editor.store().outgoing(&created);
        assert_eq!(outgoing.len(), 1);
        assert_eq!(outgoing[0].source_port_id, port("option-1"));
        assert_eq!(outgoing[0].target_node_id, NodeId::from("node-2"));

        // creation and wiring are a single undo step
        editor.undo();
        assert_eq!(editor.store().node_count(), 2);
        assert_eq!(editor.store().connection_count(), 0);
    }

    #[test]
    fn test_escape_closes_menu_without_mutation() {
        let mut editor = editor_with_two_nodes();
        let recorded = editor.history().len();
        editor.pointer_down(Position::new(200.0, 40.0), Modifiers::default());
        editor.pointer_up(Position::new(250.0, 300.0));

        assert!(!editor.key(EditorKey::Delete, false));
        assert!(editor.key(EditorKey::Escape, false));
        assert!(editor.quick_add().is_none());
        assert_eq!(editor.history().len(), recorded);
        assert_eq!(editor.store().node_count(), 2);
    }

    #[test]
    fn test_keyboard_shortcuts() {
        let mut editor = editor_with_two_nodes();

        assert!(editor.key(EditorKey::SelectAll, false));
        assert_eq!(editor.selection().nodes().len(), 2);

        assert!(editor.key(EditorKey::Duplicate, false));
        assert_eq!(editor.store().node_count(), 4);
        assert_eq!(
            editor.selection().nodes(),
            &[NodeId::from("node-3"), NodeId::from("node-4")]
        );

        assert!(editor.key(EditorKey::Backspace, false));
        assert_eq!(editor.store().node_count(), 2);

        assert!(editor.key(EditorKey::Undo, false));
        assert_eq!(editor.store().node_count(), 4);
        assert!(editor.key(EditorKey::Redo, false));
        assert_eq!(editor.store().node_count(), 2);
    }

    #[test]
    fn test_text_focus_suppresses_shortcuts() {
        let mut editor = editor_with_two_nodes();
        editor.select_all();
        let recorded = editor.history().len();

        assert!(!editor.key(EditorKey::Delete, true));
        assert!(!editor.key(EditorKey::Undo, true));
        assert!(!editor.key(EditorKey::Escape, true));

        assert_eq!(editor.store().node_count(), 2);
        assert_eq!(editor.history().len(), recorded);
        assert_eq!(editor.selection().nodes().len(), 2);
    }

    #[test]
    fn test_property_edit_prunes_selected_connection() {
        let mut editor = Editor::default();
        let meeting = editor.create_node(NodeKind::Meeting, Position::new(300.0, 0.0));
        let intro = editor.create_node(NodeKind::Dialogue, Position::default());
        editor
            .set_trigger_mode(&meeting, TriggerMode::Conditional)
            .unwrap();
        let conn = editor
            .connect(&intro, &port("out"), &meeting, &port("in"))
            .unwrap();
        editor.select_connection(conn.id.clone(), false);

        let update = editor
            .set_trigger_mode(&meeting, TriggerMode::Scheduled)
            .unwrap();

        assert_eq!(update.removed_connections, vec![conn.id]);
        assert!(editor.selection().is_empty());
        assert_eq!(editor.store().connection_count(), 0);
    }

    #[test]
    fn test_failed_patch_records_nothing() {
        let mut editor = Editor::default();
        let id = editor.create_node(NodeKind::Effect, Position::default());
        let recorded = editor.history().len();

        let result = editor.update_properties(&id, NodePatch::Dialogue(DialoguePatch::default()));
        assert!(result.is_err());
        assert_eq!(editor.history().len(), recorded);
    }

    #[test]
    fn test_edits_that_change_nothing_record_nothing() {
        let mut editor = Editor::default();
        let line = editor.create_node(NodeKind::Dialogue, Position::default());
        let meeting = editor.create_node(NodeKind::Meeting, Position::new(300.0, 0.0));
        let patch = NodePatch::Dialogue(DialoguePatch {
            text: Some("Coffee?".to_string()),
            ..Default::default()
        });

        editor.update_properties(&line, patch.clone()).unwrap();
        let recorded = editor.history().len();

        let update = editor.update_properties(&line, patch).unwrap();
        assert!(update.removed_connections.is_empty());
        editor
            .set_trigger_mode(&meeting, TriggerMode::Scheduled)
            .unwrap();
        assert_eq!(editor.history().len(), recorded);

        editor
            .set_trigger_mode(&meeting, TriggerMode::Conditional)
            .unwrap();
        assert_eq!(editor.history().len(), recorded + 1);
    }

    #[test]
    fn test_import_resets_history() {
        let mut source = editor_with_two_nodes();
        source
            .connect(
                &NodeId::from("node-1"),
                &port("out"),
                &NodeId::from("node-2"),
                &port("in"),
            )
            .unwrap();
        let json = source.export_json().unwrap();

        let mut editor = Editor::default();
        editor.create_node(NodeKind::Task, Position::default());
        let report = editor.import_json(&json).unwrap();

        assert!(report.is_clean());
        assert_eq!(editor.store().node_count(), 2);
        assert_eq!(editor.store().connection_count(), 1);
        assert!(!editor.can_undo());
        assert!(!editor.undo());
    }

    #[test]
    fn test_clear_is_undoable() {
        let mut editor = editor_with_two_nodes();
        editor.clear();
        assert_eq!(editor.store().node_count(), 0);
        assert!(editor.undo());
        assert_eq!(editor.store().node_count(), 2);
    }
}
