//! Test harness: a graph editor over an in-memory shape store.
//!
//! Mirrors how an application wires the editor, with a scripted completion
//! service and a notifier that records notices instead of showing them.

#![allow(dead_code)]

use super::{RecordingNotifier, ScriptedCompletion};
use futures::executor::block_on;
use tool_graph_editor::demo::{self, AgentPipeline};
use tool_graph_editor::{
    AgentError, AgentOutcome, CanvasHost, EditorConfig, GraphEdge, GraphEditor, GraphNode,
    InteractionOutcome, Point, PointerEvent, ShapeId, ShapeStore,
};

pub type TestEditor = GraphEditor<ShapeStore, ScriptedCompletion, RecordingNotifier>;

pub struct EditorHarness {
    pub editor: TestEditor,
    pub service: ScriptedCompletion,
    pub notifier: RecordingNotifier,
}

impl EditorHarness {
    /// Harness over an empty surface.
    pub fn new() -> Self {
        Self::with_store(ShapeStore::new())
    }

    pub fn with_store(store: ShapeStore) -> Self {
        Self::with_store_and_config(store, EditorConfig::default())
    }

    pub fn with_store_and_config(store: ShapeStore, config: EditorConfig) -> Self {
        let service = ScriptedCompletion::new();
        let notifier = RecordingNotifier::new();
        let editor = GraphEditor::with_config(store, service.clone(), config).with_notifier(notifier.clone());
        Self { editor, service, notifier }
    }

    /// Input A (0,0) → agent B (200,0) → output C (400,0), A holding `prompt`.
    pub fn with_pipeline(prompt: &str) -> (Self, AgentPipeline) {
        let mut store = ShapeStore::new();
        let pipeline = demo::agent_pipeline(&mut store);
        store.update_node(pipeline.input, |n| {
            *n = n.clone().with_input(prompt);
        });
        (Self::with_store(store), pipeline)
    }

    // === Shape access ===

    pub fn add_node(&self, node: GraphNode) -> ShapeId {
        self.editor.host().borrow_mut().create_shape(node.into())
    }

    pub fn add_edge(&self, start: Point, end: Point) -> ShapeId {
        self.editor.host().borrow_mut().create_shape(GraphEdge::between(start, end).into())
    }

    pub fn node(&self, id: ShapeId) -> Option<GraphNode> {
        self.editor.host().borrow().node(id)
    }

    pub fn edge(&self, id: ShapeId) -> Option<GraphEdge> {
        self.editor.host().borrow().shape(id).and_then(|s| s.as_edge().cloned())
    }

    pub fn edge_count(&self) -> usize {
        self.editor.host().borrow().shapes().iter().filter(|s| s.is_edge()).count()
    }

    pub fn shape_count(&self) -> usize {
        self.editor.host().borrow().len()
    }

    pub fn select(&self, ids: &[ShapeId]) {
        self.editor
            .host()
            .borrow_mut()
            .selection_mut()
            .replace_selection(ids.iter().copied());
    }

    // === Gestures (screen coordinates) ===

    pub fn click(&self, x: f32, y: f32) -> InteractionOutcome {
        let outcome = self.editor.handle_pointer(&PointerEvent::down(x, y));
        self.editor.handle_pointer(&PointerEvent::up(x, y));
        outcome
    }

    /// Press at `from`, move to `to`, release there. Returns the release outcome.
    pub fn drag(&self, from: Point, to: Point) -> InteractionOutcome {
        self.editor.handle_pointer(&PointerEvent::down(from.x, from.y));
        self.editor.handle_pointer(&PointerEvent::moved(to.x, to.y));
        self.editor.handle_pointer(&PointerEvent::up(to.x, to.y))
    }

    // === Agents ===

    pub fn run(&self, agent: ShapeId) -> Result<AgentOutcome, AgentError> {
        block_on(self.editor.activate_agent(agent))
    }
}
