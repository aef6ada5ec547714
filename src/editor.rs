//! The graph editor: interaction session, adjacency index, overlay and agent
//! execution tied to one host canvas.
//!
//! # Example
//!
//! ```ignore
//! use tool_graph_editor::{ApiKey, GraphEditor, HttpCompletionService, ShapeStore};
//!
//! slint::include_modules!();
//!
//! fn main() {
//!     let window = MainWindow::new().unwrap();
//!     let service = HttpCompletionService::new(Default::default(), || {
//!         std::env::var("COMPLETION_API_KEY").ok().map(ApiKey::new)
//!     });
//!     let editor = GraphEditor::new(ShapeStore::new(), service);
//!     window.set_shapes(editor.host().borrow().model());
//!
//!     window.on_graph_mode_toggled({
//!         let editor = editor.clone();
//!         move |on| editor.set_graph_mode(on)
//!     });
//!     window.on_input_edited(editor.input_edited_callback());
//!     window.on_node_double_clicked(editor.double_click_callback());
//!
//!     window.on_run_agent({
//!         let editor = editor.clone();
//!         move |agent| {
//!             let editor = editor.clone();
//!             slint::spawn_local(async move {
//!                 let _ = editor.activate_agent(agent).await;
//!             })
//!             .unwrap();
//!         }
//!     });
//!
//!     window.run().unwrap();
//! }
//! ```

use crate::behavior::{self, NodeView};
use crate::canvas::CanvasHost;
use crate::completion::{CompletionRequest, CompletionService};
use crate::config::EditorConfig;
use crate::error::{AgentError, LogNotifier, Notifier};
use crate::graph::{EdgeEnds, GraphIndex};
use crate::interaction::{ConnectionInteraction, EditorKey, InteractionOutcome, InteractionState, PointerEvent};
use crate::overlay::{EditOverlay, OverlayBinding, OverlayLayout};
use crate::shape::{NodeType, Shape, ShapeId};
use crate::topology::TopologyResolver;
use slint::SharedString;
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

/// Result of a key press routed through the editor.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyOutcome {
    Ignored,
    /// The edit overlay took the key (Enter commits, Escape cancels).
    Overlay { node: ShapeId },
    EdgesDeleted { edges: Vec<ShapeId> },
}

/// Result of activating a node's trigger.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentOutcome {
    /// Not an agent, or the agent is already running.
    Ignored,
    Completed {
        /// Output node that received the text, if one was connected.
        output: Option<ShapeId>,
        text: String,
        /// The completion call failed and `text` is the failure placeholder.
        degraded: bool,
    },
}

/// Graph editor bound to a host canvas and a completion service.
///
/// Clone this editor to share it across UI callbacks; clones share all state.
pub struct GraphEditor<H, C, N = LogNotifier> {
    host: Rc<RefCell<H>>,
    completion: Rc<C>,
    notifier: Rc<N>,
    index: Rc<RefCell<GraphIndex>>,
    overlay: Rc<RefCell<EditOverlay>>,
    /// Present only while graph-edit mode is on.
    session: Rc<RefCell<Option<ConnectionInteraction>>>,
    spawn_type: Rc<Cell<NodeType>>,
    config: Rc<EditorConfig>,
}

impl<H, C, N> Clone for GraphEditor<H, C, N> {
    fn clone(&self) -> Self {
        Self {
            host: self.host.clone(),
            completion: self.completion.clone(),
            notifier: self.notifier.clone(),
            index: self.index.clone(),
            overlay: self.overlay.clone(),
            session: self.session.clone(),
            spawn_type: self.spawn_type.clone(),
            config: self.config.clone(),
        }
    }
}

impl<H: CanvasHost, C: CompletionService> GraphEditor<H, C> {
    /// Create an editor over the shapes already in `host`. Connectivity of
    /// existing edges is inferred from their coordinates.
    pub fn new(host: H, completion: C) -> Self {
        Self::with_config(host, completion, EditorConfig::default())
    }

    pub fn with_config(host: H, completion: C, config: EditorConfig) -> Self {
        let index = GraphIndex::from_shapes(&host.shapes(), config.anchor_tolerance);
        Self {
            host: Rc::new(RefCell::new(host)),
            completion: Rc::new(completion),
            notifier: Rc::new(LogNotifier),
            index: Rc::new(RefCell::new(index)),
            overlay: Rc::new(RefCell::new(EditOverlay::new())),
            session: Rc::new(RefCell::new(None)),
            spawn_type: Rc::new(Cell::new(config.default_node_type)),
            config: Rc::new(config),
        }
    }
}

impl<H: CanvasHost, C: CompletionService, N: Notifier> GraphEditor<H, C, N> {
    /// Replace the sink for user notices.
    pub fn with_notifier<M: Notifier>(self, notifier: M) -> GraphEditor<H, C, M> {
        GraphEditor {
            host: self.host,
            completion: self.completion,
            notifier: Rc::new(notifier),
            index: self.index,
            overlay: self.overlay,
            session: self.session,
            spawn_type: self.spawn_type,
            config: self.config,
        }
    }

    pub fn host(&self) -> Rc<RefCell<H>> {
        self.host.clone()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Snapshot of the adjacency index.
    pub fn graph(&self) -> GraphIndex {
        self.index.borrow().clone()
    }

    // === Graph-edit mode ===

    /// Enter or leave graph-edit mode.
    ///
    /// Leaving drops the interaction session; a drag in flight is cancelled
    /// and its preview edge deleted.
    pub fn set_graph_mode(&self, active: bool) {
        let mut session = self.session.borrow_mut();
        match (active, session.is_some()) {
            (true, false) => {
                *session = Some(ConnectionInteraction::new().with_connector_radius(self.config.connector_radius));
                tracing::debug!("graph-edit mode on");
            }
            (false, true) => {
                if let Some(mut interaction) = session.take() {
                    if let InteractionOutcome::Abandoned { preview_edge } =
                        interaction.cancel(&mut *self.host.borrow_mut())
                    {
                        self.index.borrow_mut().remove_edge(preview_edge);
                    }
                }
                tracing::debug!("graph-edit mode off");
            }
            _ => {}
        }
    }

    pub fn is_graph_mode(&self) -> bool {
        self.session.borrow().is_some()
    }

    /// Whether a connection drag is in flight.
    pub fn is_dragging(&self) -> bool {
        self.session.borrow().as_ref().is_some_and(|s| s.is_dragging())
    }

    /// Node type created by clicking empty surface.
    pub fn set_spawn_type(&self, node_type: NodeType) {
        self.spawn_type.set(node_type);
    }

    pub fn spawn_type(&self) -> NodeType {
        self.spawn_type.get()
    }

    // === Event handlers ===

    /// Route a pointer event through the connection gesture. Inert outside
    /// graph-edit mode.
    pub fn handle_pointer(&self, event: &PointerEvent) -> InteractionOutcome {
        let mut session = self.session.borrow_mut();
        let Some(interaction) = session.as_mut() else {
            return InteractionOutcome::Ignored;
        };
        let outcome = interaction.handle_pointer(&mut *self.host.borrow_mut(), event, self.spawn_type.get());

        match &outcome {
            InteractionOutcome::Connected { edge, from_node, to_node } => {
                self.index.borrow_mut().connect(*edge, *from_node, *to_node);
            }
            InteractionOutcome::Abandoned { preview_edge } => {
                self.index.borrow_mut().remove_edge(*preview_edge);
            }
            _ => {}
        }
        outcome
    }

    /// Route a key press. An open overlay sees keys first; Delete and
    /// Backspace only delete edges in graph-edit mode with no overlay open.
    pub fn handle_key(&self, key: EditorKey) -> KeyOutcome {
        {
            let mut overlay = self.overlay.borrow_mut();
            if let Some(node) = overlay.bound_node() {
                return if overlay.handle_key(&mut *self.host.borrow_mut(), key) {
                    KeyOutcome::Overlay { node }
                } else {
                    KeyOutcome::Ignored
                };
            }
        }

        let mut session = self.session.borrow_mut();
        let Some(interaction) = session.as_mut() else {
            return KeyOutcome::Ignored;
        };
        match interaction.key_down(&mut *self.host.borrow_mut(), key) {
            InteractionOutcome::EdgesDeleted { edges } => {
                let mut index = self.index.borrow_mut();
                for &edge in &edges {
                    index.remove_edge(edge);
                }
                KeyOutcome::EdgesDeleted { edges }
            }
            _ => KeyOutcome::Ignored,
        }
    }

    /// Handle a key event from Slint by its text.
    pub fn handle_key_text(&self, text: &str) -> KeyOutcome {
        self.handle_key(EditorKey::from_text(text))
    }

    // === Graph maintenance ===

    /// Delete shapes through the host, keeping the index, overlay and drag
    /// state consistent with what remains.
    pub fn delete_shapes(&self, ids: &[ShapeId]) {
        let doomed: HashSet<ShapeId> = ids.iter().copied().collect();

        if let Some(interaction) = self.session.borrow_mut().as_mut() {
            if let InteractionState::Dragging(drag) = interaction.state() {
                if doomed.contains(&drag.from_node) || doomed.contains(&drag.preview_edge) {
                    if let InteractionOutcome::Abandoned { preview_edge } =
                        interaction.cancel(&mut *self.host.borrow_mut())
                    {
                        self.index.borrow_mut().remove_edge(preview_edge);
                    }
                }
            }
        }

        {
            let mut overlay = self.overlay.borrow_mut();
            if overlay.bound_node().is_some_and(|n| doomed.contains(&n)) {
                overlay.cancel();
            }
        }

        let mut host = self.host.borrow_mut();
        let mut index = self.index.borrow_mut();
        for &id in ids {
            if index.remove_edge(id).is_none() {
                index.remove_node(id);
            }
        }
        host.delete_shapes(ids);
        tracing::debug!(count = ids.len(), "shapes deleted");
    }

    /// Reconcile the index with the host after changes made outside the
    /// editor (loading a diagram, generic canvas edits).
    ///
    /// Indexed edges the host no longer has are dropped, ends on deleted nodes
    /// are loosened, and unindexed edges are adopted by matching their
    /// endpoints to anchors. An indexed end whose drawn endpoint now sits on
    /// another node's anchor is moved to that node; an end that matches no
    /// anchor keeps its attachment until [`Self::refresh_edges`] redraws it.
    ///
    /// Returns the number of adopted edges.
    pub fn sync_index(&self) -> usize {
        let shapes = self.host.borrow().shapes();
        let present: HashSet<ShapeId> = shapes.iter().map(|s| s.id).collect();
        let mut index = self.index.borrow_mut();

        let known: Vec<(ShapeId, EdgeEnds)> = index.edges().collect();
        for (edge, ends) in known {
            if !present.contains(&edge) {
                index.remove_edge(edge);
                continue;
            }
            for node in [ends.source, ends.target].into_iter().flatten() {
                if !present.contains(&node) {
                    index.remove_node(node);
                }
            }
        }

        let resolver = TopologyResolver::new(&shapes).with_tolerance(self.config.anchor_tolerance);
        let mut adopted = 0;
        let mut rerouted = 0;
        for shape in &shapes {
            let Some(edge) = shape.as_edge() else { continue };
            let drawn = EdgeEnds {
                source: resolver.source_node(edge).map(|(id, _)| id),
                target: resolver.target_node(edge).map(|(id, _)| id),
            };
            match index.ends(shape.id) {
                None => {
                    index.attach(shape.id, drawn);
                    adopted += 1;
                }
                Some(known) => {
                    let ends = EdgeEnds {
                        source: drawn.source.or(known.source),
                        target: drawn.target.or(known.target),
                    };
                    if ends != known {
                        index.attach(shape.id, ends);
                        rerouted += 1;
                    }
                }
            }
        }
        if adopted > 0 || rerouted > 0 {
            tracing::debug!(adopted, rerouted, "graph index synced with the canvas");
        }
        adopted
    }

    /// Move edge endpoints back onto their nodes' anchors, e.g. after nodes
    /// were dragged. Returns the edges that were redrawn.
    pub fn refresh_edges(&self) -> Vec<ShapeId> {
        let snapped = {
            let host = self.host.borrow();
            self.index.borrow().snap_edges(&host.shapes())
        };
        let mut host = self.host.borrow_mut();
        snapped
            .into_iter()
            .filter_map(|(id, edge)| host.update_shape(Shape::new(id, edge)).then_some(id))
            .collect()
    }

    // === Node views and inline editing ===

    pub fn node_view(&self, id: ShapeId) -> Option<NodeView> {
        let node = self.host.borrow().node(id)?;
        Some(behavior::node_view(id, &node, &self.config))
    }

    /// Views of every node, in z-order.
    pub fn node_views(&self) -> Vec<NodeView> {
        self.host
            .borrow()
            .shapes()
            .iter()
            .filter_map(|s| s.as_node().map(|n| behavior::node_view(s.id, n, &self.config)))
            .collect()
    }

    /// Keystroke in an input node's own text field.
    pub fn edit_input(&self, node: ShapeId, text: &str) -> bool {
        behavior::set_input_value(&mut *self.host.borrow_mut(), node, text)
    }

    /// Double-click on a node body. Opens the overlay for input nodes only.
    pub fn double_click(&self, node: ShapeId) -> bool {
        let Some(value) = self
            .host
            .borrow()
            .node(node)
            .and_then(|n| n.input_value().map(SharedString::from))
        else {
            return false;
        };
        self.overlay.borrow_mut().start(node, value);
        tracing::debug!(node, "overlay opened");
        true
    }

    /// Open the overlay on an input node with an explicit seed value.
    ///
    /// Only input nodes hold an editable value, so any other node is refused
    /// and the current binding stays as it is.
    pub fn start_overlay(&self, node: ShapeId, initial_value: impl Into<SharedString>) -> bool {
        let editable = self.host.borrow().node(node).is_some_and(|n| n.input_value().is_some());
        if editable {
            self.overlay.borrow_mut().start(node, initial_value);
        }
        editable
    }

    pub fn overlay_binding(&self) -> Option<OverlayBinding> {
        self.overlay.borrow().binding().cloned()
    }

    pub fn set_overlay_value(&self, value: impl Into<SharedString>) -> bool {
        self.overlay.borrow_mut().set_value(value)
    }

    /// Commit path, used for both Enter and loss of focus.
    pub fn commit_overlay(&self) -> Option<ShapeId> {
        self.overlay.borrow_mut().commit(&mut *self.host.borrow_mut())
    }

    pub fn overlay_blurred(&self) -> Option<ShapeId> {
        self.commit_overlay()
    }

    pub fn cancel_overlay(&self) -> Option<ShapeId> {
        self.overlay.borrow_mut().cancel()
    }

    pub fn overlay_layout(&self) -> Option<OverlayLayout> {
        self.overlay.borrow().layout(&*self.host.borrow())
    }

    pub fn take_overlay_focus_request(&self) -> bool {
        self.overlay.borrow_mut().take_focus_request()
    }

    // === Callback factories ===

    /// Returns a callback for an input node's `edited` event.
    pub fn input_edited_callback(&self) -> impl Fn(i32, SharedString) {
        let editor = self.clone();
        move |node, text| {
            editor.edit_input(node, &text);
        }
    }

    /// Returns a callback for `node-double-clicked`.
    pub fn double_click_callback(&self) -> impl Fn(i32) {
        let editor = self.clone();
        move |node| {
            editor.double_click(node);
        }
    }

    /// Returns a callback for key events; reports whether the key was used.
    pub fn key_callback(&self) -> impl Fn(SharedString) -> bool {
        let editor = self.clone();
        move |text| editor.handle_key_text(&text) != KeyOutcome::Ignored
    }

    // === Agent execution ===

    /// Run an agent node: read its input, call the completion service once
    /// and write the answer into the connected output node.
    ///
    /// Connectivity is first synced with the canvas, so edges drawn or
    /// re-routed by the host take part in the run.
    ///
    /// Validation failures are reported through the notifier and returned;
    /// nothing is mutated. A failed completion call is reported too, but the
    /// run still completes with the failure placeholder as its text.
    pub async fn activate_agent(&self, agent: ShapeId) -> Result<AgentOutcome, AgentError> {
        self.sync_index();
        let resolved = {
            let host = self.host.borrow();
            match host.node(agent) {
                Some(node) if node.node_type() == NodeType::Agent && !node.running() => {}
                _ => return Ok(AgentOutcome::Ignored),
            }
            behavior::resolve_agent_input(&*host, &self.index.borrow(), agent)
        };
        let input = match resolved {
            Ok(input) => input,
            Err(err) => {
                self.notifier.notify(&err);
                return Err(err);
            }
        };

        behavior::set_running(&mut *self.host.borrow_mut(), agent, true);
        tracing::info!(agent, input = input.input_node, "agent started");

        let result = self.completion.complete(CompletionRequest::user(input.prompt)).await;

        // The node may have been deleted or retyped meanwhile; this is then a no-op.
        behavior::set_running(&mut *self.host.borrow_mut(), agent, false);

        let (text, degraded) = match result {
            Ok(text) => (text, false),
            Err(err) => {
                let err = AgentError::RemoteCallFailure { agent, reason: err.to_string() };
                self.notifier.notify(&err);
                (self.config.remote_failure_text.clone(), true)
            }
        };

        let output = {
            let host = self.host.borrow();
            behavior::resolve_output_target(&*host, &self.index.borrow(), agent)
        };
        match output {
            Some(output) => {
                behavior::deliver_result(&mut *self.host.borrow_mut(), output, &text);
                tracing::info!(agent, output, degraded, "agent finished");
            }
            None => tracing::debug!(agent, "agent finished without a connected output node"),
        }

        Ok(AgentOutcome::Completed { output, text, degraded })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::ShapeStore;
    use crate::error::CompletionError;
    use crate::hit_test::Point;
    use crate::shape::{GraphEdge, GraphNode};
    use futures::executor::block_on;
    use std::future::Future;

    struct Reply(Result<&'static str, u16>);

    impl CompletionService for Reply {
        fn complete(&self, _request: CompletionRequest) -> impl Future<Output = Result<String, CompletionError>> {
            let reply = self.0.map(String::from).map_err(CompletionError::Status);
            async move { reply }
        }
    }

    fn editor(prompt: &str, reply: Result<&'static str, u16>) -> GraphEditor<ShapeStore, Reply> {
        let mut store = ShapeStore::new();
        store.create_shape(GraphNode::new(NodeType::Input).with_input(prompt).into());
        store.create_shape(GraphNode::new(NodeType::Agent).at(200.0, 0.0).into());
        store.create_shape(GraphNode::new(NodeType::Output).at(400.0, 0.0).into());
        store.create_shape(GraphEdge::between(Point::new(120.0, 24.0), Point::new(200.0, 24.0)).into());
        store.create_shape(GraphEdge::between(Point::new(320.0, 24.0), Point::new(400.0, 24.0)).into());
        GraphEditor::new(store, Reply(reply))
    }

    // ========================================================================
    // Construction
    // ========================================================================

    #[test]
    fn test_new_infers_existing_edges() {
        let editor = editor("hi", Ok("x"));
        let graph = editor.graph();
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.source_of(4), Some(1));
        assert_eq!(graph.target_of(5), Some(3));
        assert!(!editor.is_graph_mode());
    }

    // ========================================================================
    // Graph-edit mode
    // ========================================================================

    #[test]
    fn test_pointer_inert_outside_graph_mode() {
        let editor = editor("hi", Ok("x"));
        assert_eq!(editor.handle_pointer(&PointerEvent::down(600.0, 600.0)), InteractionOutcome::Ignored);
        assert_eq!(editor.host().borrow().len(), 5);
    }

    #[test]
    fn test_leaving_graph_mode_cancels_drag() {
        let editor = editor("hi", Ok("x"));
        editor.set_graph_mode(true);
        editor.handle_pointer(&PointerEvent::down(320.0, 24.0));
        assert!(editor.is_dragging());
        assert_eq!(editor.host().borrow().len(), 6);

        editor.set_graph_mode(false);

        assert!(!editor.is_dragging());
        assert_eq!(editor.host().borrow().len(), 5);
    }

    #[test]
    fn test_connected_edge_enters_index() {
        let editor = editor("hi", Ok("x"));
        editor.set_graph_mode(true);
        editor.set_spawn_type(NodeType::Failure);
        let InteractionOutcome::NodeCreated { node } = editor.handle_pointer(&PointerEvent::down(660.0, 224.0)) else {
            panic!("expected node creation");
        };

        editor.handle_pointer(&PointerEvent::down(520.0, 24.0));
        editor.handle_pointer(&PointerEvent::moved(640.0, 220.0));
        let outcome = editor.handle_pointer(&PointerEvent::up(640.0, 220.0));

        let InteractionOutcome::Connected { edge, .. } = outcome else {
            panic!("expected connection, got {outcome:?}");
        };
        assert_eq!(editor.graph().source_of(edge), Some(3));
        assert_eq!(editor.graph().target_of(edge), Some(node));
    }

    // ========================================================================
    // Keyboard routing
    // ========================================================================

    #[test]
    fn test_delete_key_updates_index() {
        let editor = editor("hi", Ok("x"));
        editor.set_graph_mode(true);
        editor.host().borrow_mut().selection_mut().replace_selection([4]);

        assert_eq!(editor.handle_key(EditorKey::Delete), KeyOutcome::EdgesDeleted { edges: vec![4] });
        assert!(!editor.graph().contains_edge(4));
        assert!(editor.graph().incoming(2).is_empty());
    }

    #[test]
    fn test_start_overlay_only_binds_input_nodes() {
        let editor = editor("hi", Ok("x"));
        assert!(!editor.start_overlay(2, "agent"));
        assert!(!editor.start_overlay(4, "edge"));
        assert!(editor.overlay_binding().is_none());

        assert!(editor.start_overlay(1, "seed"));
        assert!(!editor.start_overlay(3, "output"));
        assert_eq!(editor.overlay_binding().map(|b| b.node_id), Some(1));

        editor.commit_overlay();
        assert_eq!(editor.host().borrow().node(1).unwrap().input_value(), Some("seed"));
    }

    #[test]
    fn test_overlay_takes_keys_first() {
        let editor = editor("hi", Ok("x"));
        editor.set_graph_mode(true);
        editor.host().borrow_mut().selection_mut().replace_selection([4]);
        assert!(editor.double_click(1));

        assert_eq!(editor.handle_key(EditorKey::Delete), KeyOutcome::Ignored);
        assert!(editor.graph().contains_edge(4));
        assert_eq!(editor.handle_key(EditorKey::Escape), KeyOutcome::Overlay { node: 1 });
        assert!(editor.overlay_binding().is_none());
    }

    // ========================================================================
    // Deletion and reconciliation
    // ========================================================================

    #[test]
    fn test_delete_node_loosens_edges_and_closes_overlay() {
        let editor = editor("hi", Ok("x"));
        editor.double_click(1);
        editor.delete_shapes(&[1]);

        assert!(editor.overlay_binding().is_none());
        let graph = editor.graph();
        assert_eq!(graph.source_of(4), None);
        assert_eq!(graph.target_of(4), Some(2));
    }

    #[test]
    fn test_sync_index_adopts_and_drops() {
        let editor = editor("hi", Ok("x"));
        editor.host().borrow_mut().delete_shapes(&[5]);
        let extra = editor
            .host()
            .borrow_mut()
            .create_shape(GraphEdge::between(Point::new(320.0, 24.0), Point::new(400.0, 24.0)).into());

        assert_eq!(editor.sync_index(), 1);
        let graph = editor.graph();
        assert!(!graph.contains_edge(5));
        assert_eq!(graph.target_of(extra), Some(3));
    }

    #[test]
    fn test_sync_index_follows_rerouted_endpoint() {
        let editor = editor("hi", Ok("x"));
        let other = editor
            .host()
            .borrow_mut()
            .create_shape(GraphNode::new(NodeType::Output).at(400.0, 300.0).into());
        editor.host().borrow_mut().update_shape(Shape::new(
            5,
            GraphEdge::between(Point::new(320.0, 24.0), Point::new(400.0, 324.0)),
        ));

        assert_eq!(editor.sync_index(), 0);
        let graph = editor.graph();
        assert_eq!(graph.source_of(5), Some(2));
        assert_eq!(graph.target_of(5), Some(other));
        assert!(graph.incoming(3).is_empty());
    }

    #[test]
    fn test_sync_index_keeps_ends_off_any_anchor() {
        let editor = editor("hi", Ok("x"));
        editor.host().borrow_mut().update_node(3, |n| n.y = 200.0);

        editor.sync_index();

        assert_eq!(editor.graph().target_of(5), Some(3));
    }

    #[test]
    fn test_refresh_edges_follows_moved_node() {
        let editor = editor("hi", Ok("x"));
        editor.host().borrow_mut().update_node(2, |n| n.y = 100.0);

        let redrawn = editor.refresh_edges();

        assert_eq!(redrawn, vec![4, 5]);
        let edge = editor.host().borrow().shape(4).and_then(|s| s.as_edge().cloned()).unwrap();
        assert_eq!(edge.end, Point::new(200.0, 124.0));
    }

    // ========================================================================
    // Agent execution
    // ========================================================================

    #[test]
    fn test_activate_agent_delivers_answer() {
        let editor = editor("hi", Ok("hello"));
        let outcome = block_on(editor.activate_agent(2)).unwrap();
        assert_eq!(
            outcome,
            AgentOutcome::Completed { output: Some(3), text: "hello".into(), degraded: false }
        );
        let host = editor.host();
        let host = host.borrow();
        assert_eq!(host.node(3).unwrap().output_value(), Some("hello"));
        assert!(!host.node(2).unwrap().running());
    }

    #[test]
    fn test_activate_agent_remote_failure_degrades() {
        let editor = editor("hi", Err(500));
        let outcome = block_on(editor.activate_agent(2)).unwrap();
        assert_eq!(
            outcome,
            AgentOutcome::Completed { output: Some(3), text: "API error.".into(), degraded: true }
        );
    }

    #[test]
    fn test_activate_non_agent_ignored() {
        let editor = editor("hi", Ok("hello"));
        assert_eq!(block_on(editor.activate_agent(1)), Ok(AgentOutcome::Ignored));
        assert_eq!(block_on(editor.activate_agent(99)), Ok(AgentOutcome::Ignored));
    }

    #[test]
    fn test_activate_agent_empty_input_is_error() {
        let editor = editor("", Ok("hello"));
        assert_eq!(
            block_on(editor.activate_agent(2)),
            Err(AgentError::EmptyInput { agent: 2, input: 1 })
        );
        assert_eq!(editor.host().borrow().node(3).unwrap().output_value(), None);
    }
}
