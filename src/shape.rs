//! Shape model for the two visual entities of a tool graph: nodes and edges.
//!
//! Shapes live in the host canvas engine's store. This module only defines
//! their data, defaults, capability flags and the geometry the host needs to
//! render and hit-test them.

use crate::error::UnknownNodeType;
use crate::hit_test::{Point, Rect, SimpleConnectorGeometry, SimpleNodeGeometry};
use serde::{Deserialize, Serialize};
use slint::{Color, SharedString};
use std::fmt;
use std::str::FromStr;

/// Identifier assigned to a shape by the host canvas engine.
pub type ShapeId = i32;

pub const DEFAULT_NODE_WIDTH: f32 = 120.0;
pub const DEFAULT_NODE_HEIGHT: f32 = 48.0;
pub const DEFAULT_NODE_LABEL: &str = "Tool";

/// Radius of the round connector handle drawn on a node's right edge.
pub const CONNECTOR_RADIUS: f32 = 10.0;

pub const EDGE_STROKE_WIDTH: f32 = 3.0;
pub const EDGE_INDICATOR_WIDTH: f32 = 2.0;

pub fn default_node_color() -> Color {
    Color::from_rgb_u8(0x22, 0x22, 0x22)
}

pub fn default_edge_color() -> Color {
    Color::from_rgb_u8(0x88, 0x88, 0x88)
}

/// The behavior tag of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Input,
    #[default]
    Agent,
    Output,
    If,
    Success,
    Failure,
}

impl NodeType {
    pub const ALL: [NodeType; 6] = [
        NodeType::Input,
        NodeType::Agent,
        NodeType::Output,
        NodeType::If,
        NodeType::Success,
        NodeType::Failure,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Input => "input",
            NodeType::Agent => "agent",
            NodeType::Output => "output",
            NodeType::If => "if",
            NodeType::Success => "success",
            NodeType::Failure => "failure",
        }
    }

    /// Label given to freshly spawned nodes of this type
    pub fn default_label(&self) -> &'static str {
        match self {
            NodeType::Input => "Input",
            NodeType::Agent => "AI Agent",
            NodeType::Output => "Output",
            NodeType::If => "If",
            NodeType::Success => "Success",
            NodeType::Failure => "Failure",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = UnknownNodeType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownNodeType(s.to_string()))
    }
}

/// Per-type node state. Each variant carries only the fields its behavior
/// reads or writes.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Input { value: SharedString },
    Agent { running: bool },
    Output { value: Option<SharedString> },
    If,
    Success,
    Failure,
}

impl NodeKind {
    pub fn new(node_type: NodeType) -> Self {
        match node_type {
            NodeType::Input => NodeKind::Input { value: SharedString::default() },
            NodeType::Agent => NodeKind::Agent { running: false },
            NodeType::Output => NodeKind::Output { value: None },
            NodeType::If => NodeKind::If,
            NodeType::Success => NodeKind::Success,
            NodeType::Failure => NodeKind::Failure,
        }
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Input { .. } => NodeType::Input,
            NodeKind::Agent { .. } => NodeType::Agent,
            NodeKind::Output { .. } => NodeType::Output,
            NodeKind::If => NodeType::If,
            NodeKind::Success => NodeType::Success,
            NodeKind::Failure => NodeType::Failure,
        }
    }
}

/// A graph node: a labelled box with a source anchor on its right edge and a
/// target anchor on its left edge.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub kind: NodeKind,
    pub label: SharedString,
    pub color: Color,
}

impl Default for GraphNode {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            w: DEFAULT_NODE_WIDTH,
            h: DEFAULT_NODE_HEIGHT,
            kind: NodeKind::new(NodeType::default()),
            label: SharedString::from(DEFAULT_NODE_LABEL),
            color: default_node_color(),
        }
    }
}

impl GraphNode {
    /// Default-sized node of the given type at the origin.
    pub fn new(node_type: NodeType) -> Self {
        Self {
            kind: NodeKind::new(node_type),
            label: SharedString::from(node_type.default_label()),
            ..Self::default()
        }
    }

    /// Default-sized node whose visual center is `center`.
    pub fn centered_on(node_type: NodeType, center: Point) -> Self {
        Self::new(node_type).at(
            center.x - DEFAULT_NODE_WIDTH / 2.0,
            center.y - DEFAULT_NODE_HEIGHT / 2.0,
        )
    }

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn with_size(mut self, w: f32, h: f32) -> Self {
        self.w = w;
        self.h = h;
        self
    }

    pub fn with_label(mut self, label: impl Into<SharedString>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_input(mut self, value: impl Into<SharedString>) -> Self {
        if let NodeKind::Input { value: v } = &mut self.kind {
            *v = value.into();
        }
        self
    }

    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    /// Right-middle point, where outgoing edges start.
    pub fn source_anchor(&self) -> Point {
        Point::new(self.x + self.w, self.y + self.h / 2.0)
    }

    /// Left-middle point, where incoming edges end.
    pub fn target_anchor(&self) -> Point {
        Point::new(self.x, self.y + self.h / 2.0)
    }

    pub fn input_value(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Input { value } => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn output_value(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Output { value } => value.as_ref().map(|v| v.as_str()),
            _ => None,
        }
    }

    /// Only agent nodes ever run.
    pub fn running(&self) -> bool {
        matches!(self.kind, NodeKind::Agent { running: true })
    }
}

/// A straight connection line. Endpoints are page coordinates; the edge holds
/// no reference to the nodes it touches.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphEdge {
    pub start: Point,
    pub end: Point,
    pub color: Color,
}

impl Default for GraphEdge {
    fn default() -> Self {
        Self {
            start: Point::new(0.0, 0.0),
            end: Point::new(100.0, 100.0),
            color: default_edge_color(),
        }
    }
}

impl GraphEdge {
    pub fn between(start: Point, end: Point) -> Self {
        Self { start, end, ..Self::default() }
    }

    /// Thin rectangle around the segment; each side is at least 1 unit so
    /// axis-aligned edges still form a valid region.
    pub fn bounds(&self) -> Rect {
        let r = Rect::from_corners(self.start, self.end);
        Rect::new(r.x, r.y, r.width.max(1.0), r.height.max(1.0))
    }

    /// Path commands for drawing the edge as a line.
    pub fn path_commands(&self) -> SharedString {
        format!(
            "M {} {} L {} {}",
            self.start.x, self.start.y, self.end.x, self.end.y
        )
        .into()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    Node(GraphNode),
    Edge(GraphEdge),
}

impl ShapeKind {
    pub fn can_edit(&self) -> bool {
        // Edges are editable so their endpoints can be re-routed.
        true
    }

    pub fn can_resize(&self) -> bool {
        matches!(self, ShapeKind::Node(_))
    }

    pub fn is_aspect_ratio_locked(&self) -> bool {
        false
    }

    pub fn bounds(&self) -> Rect {
        match self {
            ShapeKind::Node(n) => n.bounds(),
            ShapeKind::Edge(e) => e.bounds(),
        }
    }
}

impl From<GraphNode> for ShapeKind {
    fn from(node: GraphNode) -> Self {
        ShapeKind::Node(node)
    }
}

impl From<GraphEdge> for ShapeKind {
    fn from(edge: GraphEdge) -> Self {
        ShapeKind::Edge(edge)
    }
}

/// A shape record as stored by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub id: ShapeId,
    pub kind: ShapeKind,
}

impl Shape {
    pub fn new(id: ShapeId, kind: impl Into<ShapeKind>) -> Self {
        Self { id, kind: kind.into() }
    }

    pub fn as_node(&self) -> Option<&GraphNode> {
        match &self.kind {
            ShapeKind::Node(n) => Some(n),
            ShapeKind::Edge(_) => None,
        }
    }

    pub fn as_node_mut(&mut self) -> Option<&mut GraphNode> {
        match &mut self.kind {
            ShapeKind::Node(n) => Some(n),
            ShapeKind::Edge(_) => None,
        }
    }

    pub fn as_edge(&self) -> Option<&GraphEdge> {
        match &self.kind {
            ShapeKind::Edge(e) => Some(e),
            ShapeKind::Node(_) => None,
        }
    }

    pub fn as_edge_mut(&mut self) -> Option<&mut GraphEdge> {
        match &mut self.kind {
            ShapeKind::Edge(e) => Some(e),
            ShapeKind::Node(_) => None,
        }
    }

    pub fn is_edge(&self) -> bool {
        matches!(self.kind, ShapeKind::Edge(_))
    }

    pub fn bounds(&self) -> Rect {
        self.kind.bounds()
    }

    /// Hit-test geometry for node shapes.
    pub fn node_geometry(&self) -> Option<SimpleNodeGeometry> {
        self.as_node().map(|n| SimpleNodeGeometry { id: self.id, rect: n.bounds() })
    }

    /// The connector handle sits centered on the source anchor.
    pub fn connector_geometry(&self) -> Option<SimpleConnectorGeometry> {
        self.as_node().map(|n| {
            let anchor = n.source_anchor();
            SimpleConnectorGeometry { node_id: self.id, x: anchor.x, y: anchor.y }
        })
    }
}
