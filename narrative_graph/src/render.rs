//! Render adapter.
//!
//! The graph model knows nothing about drawing. [`render_editor`] walks the
//! editor state and issues primitive calls on a host-provided [`DrawSurface`].
//! All coordinates are world coordinates; the surface owns the mapping to
//! screen space.

use crate::editor::{Editor, GestureState};
use crate::geometry::{
    connection_curve, content_rect, header_rect, node_rect, port_anchor, port_position, Curve,
    Rect,
};
use crate::graph::{Node, PortSide, Position};
use crate::nodes::{NodeBehavior, NodeKind};

/// Height of one content text line.
const LINE_HEIGHT: f64 = 14.0;

/// Horizontal text inset inside a node.
const TEXT_INSET: f64 = 8.0;

/// Semantic colour roles. The surface picks the actual palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    NodeBody,
    NodeHeader(NodeKind),
    NodeOutline,
    Selected,
    Port(PortSide),
    Connection,
    ConnectionSelected,
    PendingConnection,
    Text,
    MutedText,
    MenuBackground,
    MenuHighlight,
}

/// Drawing primitives supplied by the host.
pub trait DrawSurface {
    fn fill_rect(&mut self, rect: Rect, tone: Tone);

    fn stroke_rect(&mut self, rect: Rect, tone: Tone);

    fn circle(&mut self, center: Position, radius: f64, tone: Tone);

    fn curve(&mut self, curve: &Curve, tone: Tone);

    /// Left-aligned text with its baseline origin at `at`.
    fn text(&mut self, at: Position, text: &str, tone: Tone);
}

/// Draw the whole editor: connections, the pending connection, nodes and the
/// quick-add popup, in that order.
pub fn render_editor(editor: &Editor, surface: &mut dyn DrawSurface) {
    let graph = editor.graph();
    let layout = &editor.config().layout;
    let selection = editor.selection();

    for id in graph.sorted_connection_ids() {
        let Some(connection) = graph.connection(&id) else {
            continue;
        };
        if let Some(curve) = connection_curve(graph, connection, layout) {
            let tone = if selection.contains_connection(&id) {
                Tone::ConnectionSelected
            } else {
                Tone::Connection
            };
            surface.curve(&curve, tone);
        }
    }

    if let GestureState::ConnectingFromPort { origin, cursor } = editor.gesture() {
        let anchor = graph
            .node(&origin.node_id)
            .and_then(|node| port_anchor(node, &origin.port_id, layout));
        if let Some(anchor) = anchor {
            let curve = match origin.side {
                PortSide::Output => Curve::between(anchor, *cursor),
                PortSide::Input => Curve::between(*cursor, anchor),
            };
            surface.curve(&curve, Tone::PendingConnection);
        }
    }

    for id in graph.sorted_node_ids() {
        if let Some(node) = graph.node(&id) {
            render_node(node, selection.contains_node(&id), editor, surface);
        }
    }

    if let Some(menu) = editor.quick_add() {
        let config = &editor.config().quick_add;
        surface.fill_rect(menu.rect(config), Tone::MenuBackground);
        for (index, kind) in menu.items().iter().enumerate() {
            let item = menu.item_rect(index, config);
            if index == menu.highlighted() {
                surface.fill_rect(item, Tone::MenuHighlight);
            }
            surface.text(
                Position::new(item.x + TEXT_INSET, item.bottom() - item.height / 3.0),
                kind.display_name(),
                Tone::Text,
            );
        }
    }
}

fn render_node(node: &Node, selected: bool, editor: &Editor, surface: &mut dyn DrawSurface) {
    let layout = &editor.config().layout;
    let body = node_rect(node, layout);
    let header = header_rect(node, layout);

    surface.fill_rect(body, Tone::NodeBody);
    surface.fill_rect(header, Tone::NodeHeader(node.kind()));
    surface.text(
        Position::new(header.x + TEXT_INSET, header.bottom() - header.height / 3.0),
        &node.label(),
        Tone::Text,
    );

    for (side, ports) in [(PortSide::Input, &node.inputs), (PortSide::Output, &node.outputs)] {
        for (index, port) in ports.iter().enumerate() {
            let center = port_position(node, side, index, layout);
            surface.circle(center, layout.port_radius, Tone::Port(side));
            if let Some(label) = &port.label {
                let x = match side {
                    PortSide::Input => center.x + layout.port_radius + 4.0,
                    PortSide::Output => center.x - layout.node_width / 2.0,
                };
                surface.text(Position::new(x, center.y + 4.0), label, Tone::MutedText);
            }
        }
    }

    let content = content_rect(node, layout);
    let max_lines = (content.height / LINE_HEIGHT).floor() as usize;
    for (row, line) in node.payload.content_lines().iter().take(max_lines).enumerate() {
        surface.text(
            Position::new(
                content.x + TEXT_INSET,
                content.y + LINE_HEIGHT * (row as f64 + 1.0),
            ),
            line,
            Tone::Text,
        );
    }

    let outline = if selected {
        Tone::Selected
    } else {
        Tone::NodeOutline
    };
    surface.stroke_rect(body, outline);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::Modifiers;
    use crate::graph::{NodeId, PortId};
    use crate::nodes::{DialogueData, DialoguePatch, NodePatch, NodePayload};
    use game_rules::CharacterId;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Fill(Rect, Tone),
        Stroke(Rect, Tone),
        Circle(Position, Tone),
        Curve(Tone),
        Text(String, Tone),
    }

    #[derive(Default)]
    struct RecordingSurface {
        calls: Vec<Call>,
    }

    impl RecordingSurface {
        fn texts(&self) -> Vec<&str> {
            self.calls
                .iter()
                .filter_map(|call| match call {
                    Call::Text(text, _) => Some(text.as_str()),
                    _ => None,
                })
                .collect()
        }

        fn count(&self, wanted: impl Fn(&Call) -> bool) -> usize {
            self.calls.iter().filter(|call| wanted(*call)).count()
        }
    }

    impl DrawSurface for RecordingSurface {
        fn fill_rect(&mut self, rect: Rect, tone: Tone) {
            self.calls.push(Call::Fill(rect, tone));
        }

        fn stroke_rect(&mut self, rect: Rect, tone: Tone) {
            self.calls.push(Call::Stroke(rect, tone));
        }

        fn circle(&mut self, center: Position, _radius: f64, tone: Tone) {
            self.calls.push(Call::Circle(center, tone));
        }

        fn curve(&mut self, _curve: &Curve, tone: Tone) {
            self.calls.push(Call::Curve(tone));
        }

        fn text(&mut self, _at: Position, text: &str, tone: Tone) {
            self.calls.push(Call::Text(text.to_string(), tone));
        }
    }

    fn port(id: &str) -> PortId {
        PortId::from(id)
    }

    #[test]
    fn test_renders_nodes_ports_and_connections() {
        let mut editor = Editor::default();
        let a = editor.create_node(NodeKind::Dialogue, Position::default());
        let b = editor.create_node(NodeKind::Condition, Position::new(300.0, 0.0));
        editor
            .update_properties(
                &a,
                NodePatch::Dialogue(DialoguePatch {
                    speaker: Some(Some(CharacterId::new("maya"))),
                    text: Some("Morning!".to_string()),
                    ..Default::default()
                }),
            )
            .unwrap();
        editor.connect(&a, &port("out"), &b, &port("in")).unwrap();

        let mut surface = RecordingSurface::default();
        render_editor(&editor, &mut surface);

        assert!(matches!(surface.calls[0], Call::Curve(Tone::Connection)));
        assert_eq!(surface.count(|c| matches!(c, Call::Circle(..))), 5);
        assert_eq!(
            surface.count(|c| matches!(c, Call::Stroke(_, Tone::NodeOutline))),
            2
        );
        let texts = surface.texts();
        assert!(texts.contains(&"Dialogue: maya"));
        assert!(texts.contains(&"True"));
        assert!(texts.contains(&"False"));
        assert!(texts.iter().any(|t| t.contains("Morning!")));
    }

    #[test]
    fn test_selection_and_pending_connection() {
        let mut editor = Editor::default();
        let a = editor
            .add_node(Node::with_payload(
                NodeId::from("node-1"),
                Position::default(),
                NodePayload::Dialogue(DialogueData::new(None, "Hi")),
            ))
            .unwrap();
        editor.select_node(a, false);

        // start dragging a wire out of the output port
        editor.pointer_down(Position::new(200.0, 40.0), Modifiers::default());
        editor.pointer_move(Position::new(260.0, 120.0));

        let mut surface = RecordingSurface::default();
        render_editor(&editor, &mut surface);

        assert_eq!(
            surface.count(|c| matches!(c, Call::Curve(Tone::PendingConnection))),
            1
        );
        assert_eq!(surface.count(|c| matches!(c, Call::Stroke(_, Tone::Selected))), 1);
    }

    #[test]
    fn test_quick_add_menu_is_drawn_last() {
        let mut editor = Editor::default();
        editor.create_node(NodeKind::Dialogue, Position::default());
        editor.pointer_down(Position::new(200.0, 40.0), Modifiers::default());
        editor.pointer_up(Position::new(300.0, 300.0));

        let mut surface = RecordingSurface::default();
        render_editor(&editor, &mut surface);

        let texts = surface.texts();
        let tail: Vec<&str> = texts[texts.len() - NodeKind::ALL.len()..].to_vec();
        let names: Vec<&str> = NodeKind::ALL.iter().map(|k| k.display_name()).collect();
        assert_eq!(tail, names);
        assert_eq!(
            surface.count(|c| matches!(c, Call::Fill(_, Tone::MenuHighlight))),
            1
        );
    }
}
