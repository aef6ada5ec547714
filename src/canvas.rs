//! The host canvas engine contract and an in-memory implementation.
//!
//! The editor core never stores, renders or persists shapes itself; it goes
//! through [`CanvasHost`]. [`ShapeStore`] implements the contract on top of a
//! Slint `VecModel`, so a UI can bind the shape list directly.

use crate::hit_test::{Point, Rect};
use crate::selection::SelectionManager;
use crate::shape::{GraphEdge, GraphNode, Shape, ShapeId, ShapeKind};
use slint::{Model, ModelRc, VecModel};
use std::rc::Rc;

/// Operations the editor needs from the canvas engine hosting it.
pub trait CanvasHost {
    /// Store a new shape and return the id assigned to it.
    fn create_shape(&mut self, kind: ShapeKind) -> ShapeId;

    /// Replace a stored shape. Returns `false` if no shape has that id.
    fn update_shape(&mut self, shape: Shape) -> bool;

    /// Delete shapes; unknown ids are ignored.
    fn delete_shapes(&mut self, ids: &[ShapeId]);

    fn shape(&self, id: ShapeId) -> Option<Shape>;

    /// All shapes on the current surface, in z-order.
    fn shapes(&self) -> Vec<Shape>;

    fn screen_to_page(&self, point: Point) -> Point;

    fn page_to_screen(&self, point: Point) -> Point;

    fn shape_page_bounds(&self, id: ShapeId) -> Option<Rect> {
        self.shape(id).map(|s| s.bounds())
    }

    fn viewport_screen_bounds(&self) -> Rect;

    fn selected_shape_ids(&self) -> Vec<ShapeId>;

    fn node(&self, id: ShapeId) -> Option<GraphNode> {
        self.shape(id)?.as_node().cloned()
    }

    /// Apply `f` to a stored node. Returns `false` if `id` is not a node.
    fn update_node<F>(&mut self, id: ShapeId, f: F) -> bool
    where
        F: FnOnce(&mut GraphNode),
        Self: Sized,
    {
        let Some(mut shape) = self.shape(id) else {
            return false;
        };
        let Some(node) = shape.as_node_mut() else {
            return false;
        };
        f(node);
        self.update_shape(shape)
    }

    /// Apply `f` to a stored edge. Returns `false` if `id` is not an edge.
    fn update_edge<F>(&mut self, id: ShapeId, f: F) -> bool
    where
        F: FnOnce(&mut GraphEdge),
        Self: Sized,
    {
        let Some(mut shape) = self.shape(id) else {
            return false;
        };
        let Some(edge) = shape.as_edge_mut() else {
            return false;
        };
        f(edge);
        self.update_shape(shape)
    }
}

/// Zoom and pan of the visible area.
///
/// `screen = page * zoom + pan`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub zoom: f32,
    pub pan_x: f32,
    pub pan_y: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { zoom: 1.0, pan_x: 0.0, pan_y: 0.0, width: 1280.0, height: 800.0 }
    }
}

impl Viewport {
    fn zoom_or_one(&self) -> f32 {
        if self.zoom > 0.0 { self.zoom } else { 1.0 }
    }

    pub fn to_page(&self, p: Point) -> Point {
        let z = self.zoom_or_one();
        Point::new((p.x - self.pan_x) / z, (p.y - self.pan_y) / z)
    }

    pub fn to_screen(&self, p: Point) -> Point {
        let z = self.zoom_or_one();
        Point::new(p.x * z + self.pan_x, p.y * z + self.pan_y)
    }
}

/// In-memory shape store backed by a Slint model.
pub struct ShapeStore {
    shapes: Rc<VecModel<Shape>>,
    next_id: ShapeId,
    viewport: Viewport,
    selection: SelectionManager,
}

impl Default for ShapeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeStore {
    pub fn new() -> Self {
        Self {
            shapes: Rc::new(VecModel::default()),
            next_id: 1,
            viewport: Viewport::default(),
            selection: SelectionManager::new(),
        }
    }

    /// Model of all shapes for binding to a UI.
    pub fn model(&self) -> ModelRc<Shape> {
        ModelRc::from(self.shapes.clone())
    }

    pub fn len(&self) -> usize {
        self.shapes.row_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, zoom: f32, pan_x: f32, pan_y: f32) {
        self.viewport.zoom = zoom;
        self.viewport.pan_x = pan_x;
        self.viewport.pan_y = pan_y;
    }

    pub fn set_viewport_size(&mut self, width: f32, height: f32) {
        self.viewport.width = width;
        self.viewport.height = height;
    }

    pub fn selection_mut(&mut self) -> &mut SelectionManager {
        &mut self.selection
    }

    fn position(&self, id: ShapeId) -> Option<usize> {
        self.shapes.iter().position(|s| s.id == id)
    }
}

impl CanvasHost for ShapeStore {
    fn create_shape(&mut self, kind: ShapeKind) -> ShapeId {
        let id = self.next_id;
        self.next_id += 1;
        self.shapes.push(Shape { id, kind });
        id
    }

    fn update_shape(&mut self, shape: Shape) -> bool {
        match self.position(shape.id) {
            Some(row) => {
                self.shapes.set_row_data(row, shape);
                true
            }
            None => false,
        }
    }

    fn delete_shapes(&mut self, ids: &[ShapeId]) {
        for row in (0..self.shapes.row_count()).rev() {
            let hit = self.shapes.row_data(row).is_some_and(|s| ids.contains(&s.id));
            if hit {
                self.shapes.remove(row);
            }
        }
        self.selection.remove_all(ids);
    }

    fn shape(&self, id: ShapeId) -> Option<Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    fn shapes(&self) -> Vec<Shape> {
        self.shapes.iter().collect()
    }

    fn screen_to_page(&self, point: Point) -> Point {
        self.viewport.to_page(point)
    }

    fn page_to_screen(&self, point: Point) -> Point {
        self.viewport.to_screen(point)
    }

    fn viewport_screen_bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.viewport.width, self.viewport.height)
    }

    fn selected_shape_ids(&self) -> Vec<ShapeId> {
        self.selection.iter().collect()
    }
}
