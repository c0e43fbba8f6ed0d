//! Quick-add popup offered when a connection gesture is dropped on empty canvas.

use crate::config::QuickAddConfig;
use crate::geometry::Rect;
use crate::graph::Position;
use crate::nodes::NodeKind;

use super::controller::PortRef;

/// An open quick-add menu.
///
/// The menu remembers the dangling port so the chosen node can be wired to it.
#[derive(Debug, Clone, PartialEq)]
pub struct QuickAddMenu {
    /// Release point of the connection gesture; the popup opens here.
    pub anchor: Position,
    /// Port the gesture started from.
    pub origin: PortRef,
    items: Vec<NodeKind>,
    highlighted: usize,
}

impl QuickAddMenu {
    pub fn new(anchor: Position, origin: PortRef) -> Self {
        Self {
            anchor,
            origin,
            items: NodeKind::ALL.to_vec(),
            highlighted: 0,
        }
    }

    pub fn items(&self) -> &[NodeKind] {
        &self.items
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    pub fn highlighted_kind(&self) -> Option<NodeKind> {
        self.items.get(self.highlighted).copied()
    }

    /// Move the highlight up, wrapping to the last entry.
    pub fn move_up(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.highlighted = (self.highlighted + self.items.len() - 1) % self.items.len();
    }

    /// Move the highlight down, wrapping to the first entry.
    pub fn move_down(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.highlighted = (self.highlighted + 1) % self.items.len();
    }

    /// Highlight the entry under `point`, if any.
    pub fn hover(&mut self, point: Position, config: &QuickAddConfig) {
        if let Some(index) = self.item_at(point, config) {
            self.highlighted = index;
        }
    }

    pub fn rect(&self, config: &QuickAddConfig) -> Rect {
        Rect::new(
            self.anchor.x,
            self.anchor.y,
            config.width,
            config.item_height * self.items.len() as f64,
        )
    }

    pub fn item_rect(&self, index: usize, config: &QuickAddConfig) -> Rect {
        Rect::new(
            self.anchor.x,
            self.anchor.y + config.item_height * index as f64,
            config.width,
            config.item_height,
        )
    }

    /// Entry under `point`.
    pub fn item_at(&self, point: Position, config: &QuickAddConfig) -> Option<usize> {
        if !self.rect(config).contains(point) {
            return None;
        }
        let index = ((point.y - self.anchor.y) / config.item_height).floor() as usize;
        (index < self.items.len()).then_some(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{NodeId, PortId, PortSide};

    fn menu() -> QuickAddMenu {
        QuickAddMenu::new(
            Position::new(100.0, 100.0),
            PortRef {
                node_id: NodeId::from("node-1"),
                port_id: PortId::from("out"),
                side: PortSide::Output,
            },
        )
    }

    #[test]
    fn test_lists_every_kind() {
        assert_eq!(menu().items(), &NodeKind::ALL);
        assert_eq!(menu().highlighted_kind(), Some(NodeKind::Dialogue));
    }

    #[test]
    fn test_navigation_wraps() {
        let mut menu = menu();
        menu.move_up();
        assert_eq!(menu.highlighted_kind(), Some(NodeKind::Message));
        menu.move_down();
        menu.move_down();
        assert_eq!(menu.highlighted_kind(), Some(NodeKind::Choice));
    }

    #[test]
    fn test_item_at_point() {
        let config = QuickAddConfig::default();
        let menu = menu();
        assert_eq!(menu.item_at(Position::new(110.0, 101.0), &config), Some(0));
        assert_eq!(menu.item_at(Position::new(110.0, 100.0 + 24.0 * 2.5), &config), Some(2));
        assert_eq!(menu.item_at(Position::new(90.0, 110.0), &config), None);
        assert_eq!(menu.item_at(Position::new(110.0, 100.0 + 24.0 * 9.0), &config), None);
    }

    #[test]
    fn test_hover_moves_highlight() {
        let config = QuickAddConfig::default();
        let mut menu = menu();
        menu.hover(Position::new(120.0, 100.0 + 24.0 * 3.5), &config);
        assert_eq!(menu.highlighted_kind(), Some(NodeKind::Effect));
    }
}
