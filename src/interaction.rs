//! Pointer and keyboard gestures of graph-edit mode.
//!
//! Two states: `Idle` and `Dragging`. A pointer-down on a node's connector
//! starts a drag and creates a preview edge anchored at that node's source
//! anchor; moves rewrite the preview edge's free end; the release either
//! snaps the edge onto the target anchor of the node under the pointer or
//! deletes it. A pointer-down on empty surface spawns a node instead.
//!
//! Only one gesture can be in flight, so the state is a single value owned by
//! the editor's interaction session.

use crate::canvas::CanvasHost;
use crate::hit_test::{find_connector_at, find_node_at, Point};
use crate::shape::{GraphEdge, GraphNode, NodeType, ShapeId, CONNECTOR_RADIUS};
use slint::platform::Key;
use slint::SharedString;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
}

/// What the pointer landed on before graph-edit handling sees the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTarget {
    /// The drawing surface or a shape on it.
    Surface,
    /// An interactive control inside a node (text field, trigger button).
    Widget,
}

/// Pointer event in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub position: Point,
    pub button: PointerButton,
    pub target: EventTarget,
}

impl PointerEvent {
    fn new(kind: PointerEventKind, x: f32, y: f32) -> Self {
        Self {
            kind,
            position: Point::new(x, y),
            button: PointerButton::Primary,
            target: EventTarget::Surface,
        }
    }

    pub fn down(x: f32, y: f32) -> Self {
        Self::new(PointerEventKind::Down, x, y)
    }

    pub fn moved(x: f32, y: f32) -> Self {
        Self::new(PointerEventKind::Move, x, y)
    }

    pub fn up(x: f32, y: f32) -> Self {
        Self::new(PointerEventKind::Up, x, y)
    }

    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }

    pub fn on_widget(mut self) -> Self {
        self.target = EventTarget::Widget;
        self
    }
}

/// Keys the editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKey {
    Delete,
    Backspace,
    Enter,
    Escape,
    Other,
}

impl EditorKey {
    /// Map the text of a Slint key event.
    pub fn from_text(text: &str) -> Self {
        [Key::Delete, Key::Backspace, Key::Return, Key::Escape]
            .into_iter()
            .find(|&k| SharedString::from(k).as_str() == text)
            .map(EditorKey::from)
            .unwrap_or(EditorKey::Other)
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, EditorKey::Delete | EditorKey::Backspace)
    }
}

impl From<Key> for EditorKey {
    fn from(key: Key) -> Self {
        match key {
            Key::Delete => EditorKey::Delete,
            Key::Backspace => EditorKey::Backspace,
            Key::Return => EditorKey::Enter,
            Key::Escape => EditorKey::Escape,
            _ => EditorKey::Other,
        }
    }
}

/// An in-flight connection drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectionDrag {
    pub from_node: ShapeId,
    pub from_anchor: Point,
    pub preview_edge: ShapeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Dragging(ConnectionDrag),
}

/// What handling an event did. Anything but `Ignored` means the event was
/// consumed and must not reach the canvas' own handling.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionOutcome {
    Ignored,
    DragStarted { from_node: ShapeId, preview_edge: ShapeId },
    PreviewMoved { preview_edge: ShapeId },
    Connected { edge: ShapeId, from_node: ShapeId, to_node: ShapeId },
    Abandoned { preview_edge: ShapeId },
    NodeCreated { node: ShapeId },
    EdgesDeleted { edges: Vec<ShapeId> },
}

impl InteractionOutcome {
    pub fn consumed(&self) -> bool {
        !matches!(self, InteractionOutcome::Ignored)
    }
}

/// The connection gesture state machine.
#[derive(Debug, Clone)]
pub struct ConnectionInteraction {
    state: InteractionState,
    connector_radius: f32,
}

impl Default for ConnectionInteraction {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionInteraction {
    pub fn new() -> Self {
        Self { state: InteractionState::Idle, connector_radius: CONNECTOR_RADIUS }
    }

    pub fn with_connector_radius(mut self, radius: f32) -> Self {
        self.connector_radius = radius;
        self
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, InteractionState::Dragging(_))
    }

    pub fn handle_pointer<H: CanvasHost>(
        &mut self,
        host: &mut H,
        event: &PointerEvent,
        spawn_type: NodeType,
    ) -> InteractionOutcome {
        match event.kind {
            PointerEventKind::Down => self.pointer_down(host, event, spawn_type),
            PointerEventKind::Move => self.pointer_move(host, event),
            PointerEventKind::Up => self.pointer_up(host, event),
        }
    }

    /// Start a connection from a connector, or spawn a node on empty surface.
    pub fn pointer_down<H: CanvasHost>(
        &mut self,
        host: &mut H,
        event: &PointerEvent,
        spawn_type: NodeType,
    ) -> InteractionOutcome {
        if event.button != PointerButton::Primary
            || event.target == EventTarget::Widget
            || self.is_dragging()
        {
            return InteractionOutcome::Ignored;
        }

        let page = host.screen_to_page(event.position);
        let shapes = host.shapes();

        let connector_owner = find_connector_at(
            page,
            shapes.iter().filter_map(|s| s.connector_geometry()),
            self.connector_radius,
        );
        if let Some(from_node) = connector_owner {
            let Some(from_anchor) = host.node(from_node).map(|n| n.source_anchor()) else {
                return InteractionOutcome::Ignored;
            };
            let preview_edge = host.create_shape(GraphEdge::between(from_anchor, from_anchor).into());
            self.state = InteractionState::Dragging(ConnectionDrag { from_node, from_anchor, preview_edge });
            tracing::debug!(from_node, preview_edge, "connection drag started");
            return InteractionOutcome::DragStarted { from_node, preview_edge };
        }

        // Presses on a node body belong to the canvas (select, move, resize).
        if find_node_at(page, shapes.iter().filter_map(|s| s.node_geometry()), None).is_some() {
            return InteractionOutcome::Ignored;
        }

        let node = host.create_shape(GraphNode::centered_on(spawn_type, page).into());
        tracing::debug!(node, node_type = %spawn_type, x = page.x, y = page.y, "node created");
        InteractionOutcome::NodeCreated { node }
    }

    /// Drag the preview edge's free end to the pointer.
    pub fn pointer_move<H: CanvasHost>(&mut self, host: &mut H, event: &PointerEvent) -> InteractionOutcome {
        let InteractionState::Dragging(drag) = self.state else {
            return InteractionOutcome::Ignored;
        };

        let page = host.screen_to_page(event.position);
        if host.update_edge(drag.preview_edge, |e| e.end = page) {
            InteractionOutcome::PreviewMoved { preview_edge: drag.preview_edge }
        } else {
            // The preview edge was removed underneath us.
            self.state = InteractionState::Idle;
            InteractionOutcome::Abandoned { preview_edge: drag.preview_edge }
        }
    }

    /// Finish the drag: snap onto the node under the pointer, or discard.
    pub fn pointer_up<H: CanvasHost>(&mut self, host: &mut H, event: &PointerEvent) -> InteractionOutcome {
        let InteractionState::Dragging(drag) = std::mem::take(&mut self.state) else {
            return InteractionOutcome::Ignored;
        };

        let page = host.screen_to_page(event.position);
        let shapes = host.shapes();
        let target = find_node_at(
            page,
            shapes.iter().filter_map(|s| s.node_geometry()),
            Some(drag.from_node),
        )
        .and_then(|id| {
            shapes
                .iter()
                .find(|s| s.id == id)
                .and_then(|s| s.as_node())
                .map(|n| (id, n.target_anchor()))
        });

        match target {
            Some((to_node, anchor)) => {
                let snapped = host.update_edge(drag.preview_edge, |e| {
                    e.start = drag.from_anchor;
                    e.end = anchor;
                });
                if !snapped {
                    return InteractionOutcome::Abandoned { preview_edge: drag.preview_edge };
                }
                tracing::debug!(edge = drag.preview_edge, from_node = drag.from_node, to_node, "connection created");
                InteractionOutcome::Connected { edge: drag.preview_edge, from_node: drag.from_node, to_node }
            }
            None => {
                host.delete_shapes(&[drag.preview_edge]);
                tracing::debug!(preview_edge = drag.preview_edge, "connection abandoned");
                InteractionOutcome::Abandoned { preview_edge: drag.preview_edge }
            }
        }
    }

    /// Delete/Backspace removes the selected edges.
    pub fn key_down<H: CanvasHost>(&mut self, host: &mut H, key: EditorKey) -> InteractionOutcome {
        if !key.is_delete() {
            return InteractionOutcome::Ignored;
        }
        let edges = delete_selected_edges(host);
        if edges.is_empty() {
            InteractionOutcome::Ignored
        } else {
            InteractionOutcome::EdgesDeleted { edges }
        }
    }

    /// Drop an in-flight drag, deleting its preview edge.
    pub fn cancel<H: CanvasHost>(&mut self, host: &mut H) -> InteractionOutcome {
        match std::mem::take(&mut self.state) {
            InteractionState::Dragging(drag) => {
                host.delete_shapes(&[drag.preview_edge]);
                InteractionOutcome::Abandoned { preview_edge: drag.preview_edge }
            }
            InteractionState::Idle => InteractionOutcome::Ignored,
        }
    }
}

/// Delete every selected edge; selected nodes are left alone.
///
/// Returns the deleted edge ids.
pub fn delete_selected_edges<H: CanvasHost>(host: &mut H) -> Vec<ShapeId> {
    let selected = host.selected_shape_ids();
    let mut edges: Vec<ShapeId> = selected
        .into_iter()
        .filter(|&id| host.shape(id).is_some_and(|s| s.is_edge()))
        .collect();
    edges.sort_unstable();
    if !edges.is_empty() {
        host.delete_shapes(&edges);
        tracing::info!(count = edges.len(), "deleted selected edges");
    }
    edges
}
