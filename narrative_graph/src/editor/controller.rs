//! Pointer gesture state machine.
//!
//! The controller never mutates the graph. It tracks the gesture in progress,
//! edits the selection and hands back a [`GestureAction`] for the editor to
//! apply through the store.

use tracing::debug;

use super::quick_add::QuickAddMenu;
use super::selection::Selection;
use crate::config::EditorConfig;
use crate::geometry::{hit_test, Hit};
use crate::graph::{Graph, NodeId, PortId, PortSide, Position};
use crate::nodes::NodeKind;

/// Modifier keys held during a pointer press.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Add to the selection instead of replacing it.
    pub multi_select: bool,
}

impl Modifiers {
    pub fn multi_select() -> Self {
        Self { multi_select: true }
    }
}

/// A port on a specific node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortRef {
    pub node_id: NodeId,
    pub port_id: PortId,
    pub side: PortSide,
}

/// Gesture in progress.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    DraggingNode {
        node_ids: Vec<NodeId>,
        /// Pointer position of the last applied move.
        last: Position,
        /// Sum of all moves applied so far.
        total: Position,
    },
    ConnectingFromPort {
        origin: PortRef,
        cursor: Position,
    },
    /// A connection gesture was dropped on empty canvas.
    QuickAddOpen(QuickAddMenu),
}

/// Graph change requested by a gesture.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureAction {
    /// Transient move while dragging. Not recorded in history.
    MoveNodes { node_ids: Vec<NodeId>, delta: Position },
    /// Drag released. `delta` is the last unapplied move, `total` the whole drag.
    CommitDrag {
        node_ids: Vec<NodeId>,
        delta: Position,
        total: Position,
    },
    Connect { source: PortRef, target: PortRef },
    /// Create a node from the quick-add menu and wire it to `origin`.
    CreateWired {
        kind: NodeKind,
        position: Position,
        origin: PortRef,
    },
}

#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    state: GestureState,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == GestureState::Idle
    }

    pub fn quick_add(&self) -> Option<&QuickAddMenu> {
        match &self.state {
            GestureState::QuickAddOpen(menu) => Some(menu),
            _ => None,
        }
    }

    /// Drop any gesture state without producing an action.
    pub fn reset(&mut self) {
        self.state = GestureState::Idle;
    }

    pub fn pointer_down(
        &mut self,
        graph: &Graph,
        config: &EditorConfig,
        selection: &mut Selection,
        point: Position,
        modifiers: Modifiers,
    ) -> Option<GestureAction> {
        match std::mem::take(&mut self.state) {
            GestureState::QuickAddOpen(menu) => {
                let index = menu.item_at(point, &config.quick_add)?;
                let kind = *menu.items().get(index)?;
                debug!(%kind, "quick-add entry picked");
                return Some(GestureAction::CreateWired {
                    kind,
                    position: menu.anchor,
                    origin: menu.origin,
                });
            }
            GestureState::Idle => {}
            stale => debug!(?stale, "gesture abandoned without pointer up"),
        }

        match hit_test(graph, &config.layout, point) {
            Hit::Port {
                node_id,
                port_id,
                side,
            } => {
                debug!(node = %node_id, port = %port_id, "connection gesture started");
                self.state = GestureState::ConnectingFromPort {
                    origin: PortRef {
                        node_id,
                        port_id,
                        side,
                    },
                    cursor: point,
                };
            }
            Hit::Node(node_id) => {
                if modifiers.multi_select || !selection.contains_node(&node_id) {
                    selection.select_node(node_id, modifiers.multi_select);
                }
                self.state = GestureState::DraggingNode {
                    node_ids: selection.nodes().to_vec(),
                    last: point,
                    total: Position::default(),
                };
            }
            Hit::Connection(connection_id) => {
                selection.select_connection(connection_id, modifiers.multi_select);
            }
            Hit::Canvas => selection.clear(),
        }
        None
    }

    pub fn pointer_move(&mut self, config: &EditorConfig, point: Position) -> Option<GestureAction> {
        match &mut self.state {
            GestureState::DraggingNode {
                node_ids,
                last,
                total,
            } => {
                let delta = point - *last;
                if delta == Position::default() {
                    return None;
                }
                *last = point;
                *total = *total + delta;
                Some(GestureAction::MoveNodes {
                    node_ids: node_ids.clone(),
                    delta,
                })
            }
            GestureState::ConnectingFromPort { cursor, .. } => {
                *cursor = point;
                None
            }
            GestureState::QuickAddOpen(menu) => {
                menu.hover(point, &config.quick_add);
                None
            }
            GestureState::Idle => None,
        }
    }

    pub fn pointer_up(
        &mut self,
        graph: &Graph,
        config: &EditorConfig,
        point: Position,
    ) -> Option<GestureAction> {
        match std::mem::take(&mut self.state) {
            GestureState::DraggingNode {
                node_ids,
                last,
                total,
            } => {
                let delta = point - last;
                Some(GestureAction::CommitDrag {
                    node_ids,
                    delta,
                    total: total + delta,
                })
            }
            GestureState::ConnectingFromPort { origin, .. } => {
                self.finish_connection(graph, config, origin, point)
            }
            menu @ GestureState::QuickAddOpen(_) => {
                self.state = menu;
                None
            }
            GestureState::Idle => None,
        }
    }

    fn finish_connection(
        &mut self,
        graph: &Graph,
        config: &EditorConfig,
        origin: PortRef,
        point: Position,
    ) -> Option<GestureAction> {
        match hit_test(graph, &config.layout, point) {
            Hit::Port {
                node_id,
                port_id,
                side,
            } => {
                if side == origin.side || node_id == origin.node_id {
                    debug!("connection gesture released on incompatible port");
                    return None;
                }
                let other = PortRef {
                    node_id,
                    port_id,
                    side,
                };
                let (source, target) = match origin.side {
                    PortSide::Output => (origin, other),
                    PortSide::Input => (other, origin),
                };
                Some(GestureAction::Connect { source, target })
            }
            Hit::Canvas => {
                debug!(x = point.x, y = point.y, "quick-add menu opened");
                self.state = GestureState::QuickAddOpen(QuickAddMenu::new(point, origin));
                None
            }
            Hit::Node(_) | Hit::Connection(_) => {
                debug!("connection gesture discarded");
                None
            }
        }
    }

    /// Abandon the gesture. A drag in progress is moved back to where it started.
    pub fn cancel(&mut self) -> Option<GestureAction> {
        match std::mem::take(&mut self.state) {
            GestureState::DraggingNode {
                node_ids, total, ..
            } if total != Position::default() => Some(GestureAction::MoveNodes {
                node_ids,
                delta: Position::default() - total,
            }),
            _ => None,
        }
    }

    pub fn menu_up(&mut self) {
        if let GestureState::QuickAddOpen(menu) = &mut self.state {
            menu.move_up();
        }
    }

    pub fn menu_down(&mut self) {
        if let GestureState::QuickAddOpen(menu) = &mut self.state {
            menu.move_down();
        }
    }

    /// Pick the highlighted quick-add entry.
    pub fn menu_confirm(&mut self) -> Option<GestureAction> {
        match std::mem::take(&mut self.state) {
            GestureState::QuickAddOpen(menu) => {
                let kind = menu.highlighted_kind()?;
                Some(GestureAction::CreateWired {
                    kind,
                    position: menu.anchor,
                    origin: menu.origin,
                })
            }
            other => {
                self.state = other;
                None
            }
        }
    }
}
