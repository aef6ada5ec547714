//! Floating single-line editor bound to one node at a time.
//!
//! There is exactly one overlay per editor. It is idle (renders nothing)
//! until [`EditOverlay::start`] binds it to a node; committing or cancelling
//! unbinds it again.

use crate::canvas::CanvasHost;
use crate::hit_test::{Point, Rect};
use crate::interaction::EditorKey;
use crate::shape::{NodeKind, ShapeId};
use slint::SharedString;

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayBinding {
    pub node_id: ShapeId,
    pub value: SharedString,
}

/// Where to draw the overlay, in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayLayout {
    pub rect: Rect,
    /// Whether the rect overlaps the visible viewport at all.
    pub visible: bool,
}

#[derive(Debug, Default)]
pub struct EditOverlay {
    binding: Option<OverlayBinding>,
    focus_pending: bool,
}

impl EditOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind to `node_id` and seed the field. Any previous binding is dropped
    /// without being written.
    pub fn start(&mut self, node_id: ShapeId, initial_value: impl Into<SharedString>) {
        self.binding = Some(OverlayBinding { node_id, value: initial_value.into() });
        self.focus_pending = true;
    }

    pub fn is_active(&self) -> bool {
        self.binding.is_some()
    }

    pub fn binding(&self) -> Option<&OverlayBinding> {
        self.binding.as_ref()
    }

    pub fn bound_node(&self) -> Option<ShapeId> {
        self.binding.as_ref().map(|b| b.node_id)
    }

    /// Text typed into the field. Ignored while idle.
    pub fn set_value(&mut self, value: impl Into<SharedString>) -> bool {
        match &mut self.binding {
            Some(binding) => {
                binding.value = value.into();
                true
            }
            None => false,
        }
    }

    /// True once after each `start`, when the UI has mounted the field and
    /// should give it keyboard focus.
    pub fn take_focus_request(&mut self) -> bool {
        std::mem::take(&mut self.focus_pending)
    }

    /// Write the edited value into the bound node and close.
    ///
    /// Returns the node that was written. If the node is gone or no longer
    /// holds an editable value the overlay still closes.
    pub fn commit<H: CanvasHost>(&mut self, host: &mut H) -> Option<ShapeId> {
        let binding = self.close()?;
        let mut written = false;
        host.update_node(binding.node_id, |node| {
            if let NodeKind::Input { value } = &mut node.kind {
                *value = binding.value.clone();
                written = true;
            }
        });
        if written {
            tracing::debug!(node = binding.node_id, "overlay value committed");
            Some(binding.node_id)
        } else {
            None
        }
    }

    /// Close without writing.
    pub fn cancel(&mut self) -> Option<ShapeId> {
        self.close().map(|b| b.node_id)
    }

    fn close(&mut self) -> Option<OverlayBinding> {
        self.focus_pending = false;
        self.binding.take()
    }

    /// Enter commits, Escape cancels. Returns whether the key was handled.
    pub fn handle_key<H: CanvasHost>(&mut self, host: &mut H, key: EditorKey) -> bool {
        if !self.is_active() {
            return false;
        }
        match key {
            EditorKey::Enter => {
                self.commit(host);
                true
            }
            EditorKey::Escape => {
                self.cancel();
                true
            }
            _ => false,
        }
    }

    /// Screen rect covering the bound node, recomputed from the node's
    /// current page bounds so the overlay follows scroll and zoom.
    pub fn layout<H: CanvasHost>(&self, host: &H) -> Option<OverlayLayout> {
        let binding = self.binding.as_ref()?;
        let bounds = host.shape_page_bounds(binding.node_id)?;
        let top_left = host.page_to_screen(Point::new(bounds.x, bounds.y));
        let bottom_right = host.page_to_screen(Point::new(bounds.max_x(), bounds.max_y()));
        let rect = Rect::from_corners(top_left, bottom_right);
        Some(OverlayLayout { rect, visible: rect.intersects(&host.viewport_screen_bounds()) })
    }
}
