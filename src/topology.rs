//! Geometric topology resolution.
//!
//! An edge is attached to a node at one end when that endpoint lies within
//! the anchor tolerance of the node's matching anchor: the first endpoint
//! against source anchors, the second against target anchors. Every query is
//! a linear scan over the current shapes; diagrams are hand-built and small.

use crate::shape::{GraphEdge, GraphNode, Shape, ShapeId};

/// Distance (per axis, in page units) within which an endpoint counts as
/// sitting on an anchor. Does not scale with zoom.
pub const ANCHOR_TOLERANCE: f32 = 2.0;

/// On-demand resolver over a snapshot of shapes.
#[derive(Clone, Copy)]
pub struct TopologyResolver<'a> {
    shapes: &'a [Shape],
    tolerance: f32,
}

impl<'a> TopologyResolver<'a> {
    pub fn new(shapes: &'a [Shape]) -> Self {
        Self { shapes, tolerance: ANCHOR_TOLERANCE }
    }

    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    fn nodes(&self) -> impl Iterator<Item = (ShapeId, &'a GraphNode)> + 'a {
        self.shapes.iter().filter_map(|s| s.as_node().map(|n| (s.id, n)))
    }

    fn edges(&self) -> impl Iterator<Item = (ShapeId, &'a GraphEdge)> + 'a {
        self.shapes.iter().filter_map(|s| s.as_edge().map(|e| (s.id, e)))
    }

    /// Node whose source anchor matches the edge's first endpoint.
    pub fn source_node(&self, edge: &GraphEdge) -> Option<(ShapeId, &'a GraphNode)> {
        let tolerance = self.tolerance;
        self.nodes()
            .find(|(_, n)| n.source_anchor().approx_eq(edge.start, tolerance))
    }

    /// Node whose target anchor matches the edge's second endpoint.
    pub fn target_node(&self, edge: &GraphEdge) -> Option<(ShapeId, &'a GraphNode)> {
        let tolerance = self.tolerance;
        self.nodes()
            .find(|(_, n)| n.target_anchor().approx_eq(edge.end, tolerance))
    }

    /// Edges whose second endpoint sits on the node's target anchor.
    pub fn incoming_edges(&self, node: &GraphNode) -> Vec<ShapeId> {
        let anchor = node.target_anchor();
        let tolerance = self.tolerance;
        self.edges()
            .filter(|(_, e)| e.end.approx_eq(anchor, tolerance))
            .map(|(id, _)| id)
            .collect()
    }

    /// Edges whose first endpoint sits on the node's source anchor.
    pub fn outgoing_edges(&self, node: &GraphNode) -> Vec<ShapeId> {
        let anchor = node.source_anchor();
        let tolerance = self.tolerance;
        self.edges()
            .filter(|(_, e)| e.start.approx_eq(anchor, tolerance))
            .map(|(id, _)| id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hit_test::Point;
    use crate::shape::NodeType;

    fn chain() -> Vec<Shape> {
        vec![
            Shape::new(1, GraphNode::new(NodeType::Input).at(0.0, 0.0)),
            Shape::new(2, GraphNode::new(NodeType::Agent).at(200.0, 0.0)),
            Shape::new(3, GraphNode::new(NodeType::Output).at(400.0, 0.0)),
            Shape::new(10, GraphEdge::between(Point::new(120.0, 24.0), Point::new(200.0, 24.0))),
            Shape::new(11, GraphEdge::between(Point::new(320.0, 24.0), Point::new(400.0, 24.0))),
        ]
    }

    fn edge(shapes: &[Shape], id: ShapeId) -> &GraphEdge {
        shapes.iter().find(|s| s.id == id).and_then(Shape::as_edge).unwrap()
    }

    fn node(shapes: &[Shape], id: ShapeId) -> &GraphNode {
        shapes.iter().find(|s| s.id == id).and_then(Shape::as_node).unwrap()
    }

    // ========================================================================
    // Edge -> node
    // ========================================================================

    #[test]
    fn test_source_and_target_of_edge() {
        let shapes = chain();
        let resolver = TopologyResolver::new(&shapes);

        assert_eq!(resolver.source_node(edge(&shapes, 10)).map(|(id, _)| id), Some(1));
        assert_eq!(resolver.target_node(edge(&shapes, 10)).map(|(id, _)| id), Some(2));
        assert_eq!(resolver.source_node(edge(&shapes, 11)).map(|(id, _)| id), Some(2));
        assert_eq!(resolver.target_node(edge(&shapes, 11)).map(|(id, _)| id), Some(3));
    }

    #[test]
    fn test_dangling_edge_resolves_to_nothing() {
        let shapes = vec![
            Shape::new(1, GraphNode::default()),
            Shape::new(9, GraphEdge::between(Point::new(500.0, 500.0), Point::new(600.0, 600.0))),
        ];
        let resolver = TopologyResolver::new(&shapes);
        assert!(resolver.source_node(edge(&shapes, 9)).is_none());
        assert!(resolver.target_node(edge(&shapes, 9)).is_none());
    }

    // ========================================================================
    // Node -> edges
    // ========================================================================

    #[test]
    fn test_incoming_and_outgoing_edges() {
        let shapes = chain();
        let resolver = TopologyResolver::new(&shapes);

        assert_eq!(resolver.incoming_edges(node(&shapes, 2)), vec![10]);
        assert_eq!(resolver.outgoing_edges(node(&shapes, 2)), vec![11]);
        assert!(resolver.incoming_edges(node(&shapes, 1)).is_empty());
        assert!(resolver.outgoing_edges(node(&shapes, 3)).is_empty());
    }

    #[test]
    fn test_endpoint_roles_are_not_interchangeable() {
        // Second endpoint on a source anchor does not make an outgoing edge.
        let shapes = vec![
            Shape::new(1, GraphNode::default()),
            Shape::new(2, GraphEdge::between(Point::new(300.0, 300.0), Point::new(120.0, 24.0))),
        ];
        let resolver = TopologyResolver::new(&shapes);
        assert!(resolver.outgoing_edges(node(&shapes, 1)).is_empty());
        assert!(resolver.incoming_edges(node(&shapes, 1)).is_empty());
    }

    // ========================================================================
    // Tolerance
    // ========================================================================

    #[test]
    fn test_noise_below_tolerance_still_attaches() {
        let mut shapes = chain();
        if let Some(n) = shapes[1].as_node_mut() {
            n.x += 1.9;
            n.y -= 1.5;
        }
        let resolver = TopologyResolver::new(&shapes);
        assert_eq!(resolver.incoming_edges(node(&shapes, 2)), vec![10]);
        assert_eq!(resolver.outgoing_edges(node(&shapes, 2)), vec![11]);
    }

    #[test]
    fn test_noise_above_tolerance_detaches() {
        let mut shapes = chain();
        if let Some(n) = shapes[1].as_node_mut() {
            n.x += 2.5;
        }
        let resolver = TopologyResolver::new(&shapes);
        assert!(resolver.incoming_edges(node(&shapes, 2)).is_empty());
        assert!(resolver.outgoing_edges(node(&shapes, 2)).is_empty());
        assert!(resolver.target_node(edge(&shapes, 10)).is_none());
    }

    #[test]
    fn test_custom_tolerance() {
        let mut shapes = chain();
        if let Some(n) = shapes[1].as_node_mut() {
            n.y += 4.0;
        }
        let strict = TopologyResolver::new(&shapes);
        let loose = strict.with_tolerance(5.0);
        assert!(strict.incoming_edges(node(&shapes, 2)).is_empty());
        assert_eq!(loose.incoming_edges(node(&shapes, 2)), vec![10]);
    }
}
