//! World-space geometry of nodes, ports and connections, and pointer hit testing.
//!
//! Node layout:
//! - header strip of `header_height`
//! - one row per port, inputs on the left edge and outputs on the right edge
//! - a content area of `content_height` below the rows

use crate::config::LayoutConfig;
use crate::graph::{Connection, ConnectionId, Graph, Node, NodeId, PortId, PortSide, Position};

/// Segments used to approximate a connection curve for hit testing.
const CURVE_SAMPLES: usize = 32;

/// Minimum horizontal handle length of a connection curve.
const MIN_CURVE_HANDLE: f64 = 50.0;

/// Axis-aligned rectangle in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn origin(&self) -> Position {
        Position::new(self.x, self.y)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Edges are inclusive.
    pub fn contains(&self, point: Position) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }
}

/// Cubic curve drawn for a connection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Curve {
    pub start: Position,
    pub control_start: Position,
    pub control_end: Position,
    pub end: Position,
}

impl Curve {
    /// Curve leaving `start` to the right and entering `end` from the left.
    pub fn between(start: Position, end: Position) -> Self {
        let handle = ((end.x - start.x).abs() / 2.0).max(MIN_CURVE_HANDLE);
        Self {
            start,
            control_start: start + Position::new(handle, 0.0),
            control_end: end - Position::new(handle, 0.0),
            end,
        }
    }

    pub fn point_at(&self, t: f64) -> Position {
        let u = 1.0 - t;
        let a = u * u * u;
        let b = 3.0 * u * u * t;
        let c = 3.0 * u * t * t;
        let d = t * t * t;
        Position::new(
            a * self.start.x + b * self.control_start.x + c * self.control_end.x + d * self.end.x,
            a * self.start.y + b * self.control_start.y + c * self.control_end.y + d * self.end.y,
        )
    }

    /// Approximate distance from `point` to the curve.
    pub fn distance_to(&self, point: Position) -> f64 {
        let mut best = f64::INFINITY;
        let mut previous = self.start;
        for step in 1..=CURVE_SAMPLES {
            let current = self.point_at(step as f64 / CURVE_SAMPLES as f64);
            best = best.min(segment_distance(point, previous, current));
            previous = current;
        }
        best
    }
}

fn segment_distance(point: Position, a: Position, b: Position) -> f64 {
    let ab = b - a;
    let length_sq = ab.x * ab.x + ab.y * ab.y;
    if length_sq == 0.0 {
        return point.distance_to(a);
    }
    let ap = point - a;
    let t = ((ap.x * ab.x + ap.y * ab.y) / length_sq).clamp(0.0, 1.0);
    point.distance_to(Position::new(a.x + ab.x * t, a.y + ab.y * t))
}

pub fn node_height(node: &Node, layout: &LayoutConfig) -> f64 {
    let rows = node.inputs.len().max(node.outputs.len()).max(1);
    layout.header_height + rows as f64 * layout.port_spacing + layout.content_height
}

pub fn node_rect(node: &Node, layout: &LayoutConfig) -> Rect {
    Rect::new(
        node.position.x,
        node.position.y,
        layout.node_width,
        node_height(node, layout),
    )
}

pub fn header_rect(node: &Node, layout: &LayoutConfig) -> Rect {
    Rect::new(
        node.position.x,
        node.position.y,
        layout.node_width,
        layout.header_height,
    )
}

/// Area below the port rows where content lines go.
pub fn content_rect(node: &Node, layout: &LayoutConfig) -> Rect {
    let body = node_rect(node, layout);
    Rect::new(
        body.x,
        body.bottom() - layout.content_height,
        layout.node_width,
        layout.content_height,
    )
}

/// Anchor of the `index`-th port on `side`.
pub fn port_position(node: &Node, side: PortSide, index: usize, layout: &LayoutConfig) -> Position {
    let x = match side {
        PortSide::Input => node.position.x,
        PortSide::Output => node.position.x + layout.node_width,
    };
    let y = node.position.y + layout.header_height + layout.port_spacing * (index as f64 + 0.5);
    Position::new(x, y)
}

/// Anchor of a port by id.
pub fn port_anchor(node: &Node, port_id: &PortId, layout: &LayoutConfig) -> Option<Position> {
    let side = node.port_side(port_id)?;
    let ports = match side {
        PortSide::Input => &node.inputs,
        PortSide::Output => &node.outputs,
    };
    let index = ports.iter().position(|p| &p.id == port_id)?;
    Some(port_position(node, side, index, layout))
}

/// Curve of a stored connection, or `None` if an endpoint is missing.
pub fn connection_curve(graph: &Graph, connection: &Connection, layout: &LayoutConfig) -> Option<Curve> {
    let source = graph.node(&connection.source_node_id)?;
    let target = graph.node(&connection.target_node_id)?;
    Some(Curve::between(
        port_anchor(source, &connection.source_port_id, layout)?,
        port_anchor(target, &connection.target_port_id, layout)?,
    ))
}

/// What lies under the pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hit {
    Port {
        node_id: NodeId,
        port_id: PortId,
        side: PortSide,
    },
    Node(NodeId),
    Connection(ConnectionId),
    Canvas,
}

/// Find the topmost item under `point`.
///
/// Nodes are drawn in id order, so later ids are on top. Ports win over node
/// bodies, bodies win over connections.
pub fn hit_test(graph: &Graph, layout: &LayoutConfig, point: Position) -> Hit {
    let order = graph.sorted_node_ids();

    for node in order.iter().rev().filter_map(|id| graph.node(id)) {
        for (side, ports) in [(PortSide::Input, &node.inputs), (PortSide::Output, &node.outputs)] {
            for (index, port) in ports.iter().enumerate() {
                if port_position(node, side, index, layout).distance_to(point) <= layout.port_radius {
                    return Hit::Port {
                        node_id: node.id.clone(),
                        port_id: port.id.clone(),
                        side,
                    };
                }
            }
        }
    }

    for node in order.iter().rev().filter_map(|id| graph.node(id)) {
        if node_rect(node, layout).contains(point) {
            return Hit::Node(node.id.clone());
        }
    }

    for id in graph.sorted_connection_ids().iter().rev() {
        let Some(connection) = graph.connection(id) else {
            continue;
        };
        if let Some(curve) = connection_curve(graph, connection, layout) {
            if curve.distance_to(point) <= layout.connection_tolerance {
                return Hit::Connection(id.clone());
            }
        }
    }

    Hit::Canvas
}
