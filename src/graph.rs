use crate::shape::{GraphEdge, Shape, ShapeId};
use crate::topology::TopologyResolver;
use std::collections::HashMap;

/// Which nodes an edge is attached to. Either end may be loose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EdgeEnds {
    pub source: Option<ShapeId>,
    pub target: Option<ShapeId>,
}

/// Explicit adjacency between nodes and edges.
///
/// This is the source of truth for connectivity once an edge is known to the
/// index. Edge endpoint coordinates are only where the line is drawn; use
/// [`GraphIndex::snap_edges`] to bring them back onto the anchors after nodes
/// move.
///
/// Per-node edge lists keep insertion order, so "the first incoming edge" is
/// the one connected earliest.
#[derive(Debug, Clone, Default)]
pub struct GraphIndex {
    edges: HashMap<ShapeId, EdgeEnds>,
    incoming: HashMap<ShapeId, Vec<ShapeId>>,
    outgoing: HashMap<ShapeId, Vec<ShapeId>>,
}

impl GraphIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index from coordinates alone, e.g. for a diagram loaded
    /// from a file or one of the static examples.
    ///
    /// Edges are visited in shape order, which fixes the order of the
    /// per-node lists.
    pub fn from_shapes(shapes: &[Shape], tolerance: f32) -> Self {
        let resolver = TopologyResolver::new(shapes).with_tolerance(tolerance);
        let mut index = Self::new();
        for shape in shapes {
            if let Some(edge) = shape.as_edge() {
                let ends = EdgeEnds {
                    source: resolver.source_node(edge).map(|(id, _)| id),
                    target: resolver.target_node(edge).map(|(id, _)| id),
                };
                index.attach(shape.id, ends);
            }
        }
        index
    }

    /// Record `edge` as running from `source` to `target`.
    pub fn connect(&mut self, edge: ShapeId, source: ShapeId, target: ShapeId) {
        self.attach(edge, EdgeEnds { source: Some(source), target: Some(target) });
    }

    /// Insert or replace the attachment of an edge.
    pub fn attach(&mut self, edge: ShapeId, ends: EdgeEnds) {
        self.remove_edge(edge);
        if let Some(source) = ends.source {
            self.outgoing.entry(source).or_default().push(edge);
        }
        if let Some(target) = ends.target {
            self.incoming.entry(target).or_default().push(edge);
        }
        self.edges.insert(edge, ends);
    }

    /// Forget an edge. Returns what it was attached to, if it was known.
    pub fn remove_edge(&mut self, edge: ShapeId) -> Option<EdgeEnds> {
        let ends = self.edges.remove(&edge)?;
        if let Some(source) = ends.source {
            detach(&mut self.outgoing, source, edge);
        }
        if let Some(target) = ends.target {
            detach(&mut self.incoming, target, edge);
        }
        Some(ends)
    }

    /// Forget a node. Edges touching it stay indexed with that end loose.
    ///
    /// Returns the ids of the affected edges.
    pub fn remove_node(&mut self, node: ShapeId) -> Vec<ShapeId> {
        let mut affected = Vec::new();
        for edge in self.outgoing.remove(&node).unwrap_or_default() {
            if let Some(ends) = self.edges.get_mut(&edge) {
                ends.source = None;
            }
            affected.push(edge);
        }
        for edge in self.incoming.remove(&node).unwrap_or_default() {
            if let Some(ends) = self.edges.get_mut(&edge) {
                ends.target = None;
            }
            if !affected.contains(&edge) {
                affected.push(edge);
            }
        }
        affected
    }

    pub fn ends(&self, edge: ShapeId) -> Option<EdgeEnds> {
        self.edges.get(&edge).copied()
    }

    pub fn source_of(&self, edge: ShapeId) -> Option<ShapeId> {
        self.edges.get(&edge).and_then(|e| e.source)
    }

    pub fn target_of(&self, edge: ShapeId) -> Option<ShapeId> {
        self.edges.get(&edge).and_then(|e| e.target)
    }

    pub fn incoming(&self, node: ShapeId) -> &[ShapeId] {
        self.incoming.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn outgoing(&self, node: ShapeId) -> &[ShapeId] {
        self.outgoing.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every indexed edge with its attachment, in no particular order.
    pub fn edges(&self) -> impl Iterator<Item = (ShapeId, EdgeEnds)> + '_ {
        self.edges.iter().map(|(&id, &ends)| (id, ends))
    }

    pub fn contains_edge(&self, edge: ShapeId) -> bool {
        self.edges.contains_key(&edge)
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Edges whose drawn endpoints no longer sit on their nodes' anchors,
    /// with the endpoints moved back onto the anchors.
    ///
    /// Loose ends keep their coordinates.
    pub fn snap_edges(&self, shapes: &[Shape]) -> Vec<(ShapeId, GraphEdge)> {
        let node = |id: Option<ShapeId>| {
            id.and_then(|id| shapes.iter().find(|s| s.id == id))
                .and_then(Shape::as_node)
        };

        shapes
            .iter()
            .filter_map(|shape| {
                let edge = shape.as_edge()?;
                let ends = self.edges.get(&shape.id)?;
                let mut snapped = edge.clone();
                if let Some(source) = node(ends.source) {
                    snapped.start = source.source_anchor();
                }
                if let Some(target) = node(ends.target) {
                    snapped.end = target.target_anchor();
                }
                (snapped != *edge).then_some((shape.id, snapped))
            })
            .collect()
    }
}

fn detach(map: &mut HashMap<ShapeId, Vec<ShapeId>>, node: ShapeId, edge: ShapeId) {
    if let Some(list) = map.get_mut(&node) {
        list.retain(|&e| e != edge);
        if list.is_empty() {
            map.remove(&node);
        }
    }
}
