//! # Tool Graph Editor
//!
//! Headless core of a node-graph editor for tool chains: input nodes feed an
//! agent node, which asks a remote text-completion service and writes the
//! answer into an output node.
//!
//! The crate never renders anything. It keeps shapes in a host canvas
//! (anything implementing [`CanvasHost`]), interprets pointer and keyboard
//! gestures, and produces per-node view data for a UI to draw.
//!
//! ## Features
//!
//! - **Connection gestures** - Drag from a node's connector onto another node
//!   to connect them; click empty surface to spawn a node
//! - **Explicit adjacency** - [`GraphIndex`] tracks which edges touch which
//!   nodes; coordinates only decide where lines are drawn
//! - **Geometry recovery** - [`TopologyResolver`] infers connectivity from
//!   endpoint coordinates for diagrams loaded without adjacency
//! - **Async agents** - [`GraphEditor::activate_agent`] runs one completion
//!   request and propagates the result downstream
//! - **Inline editing** - A single floating [`EditOverlay`] that follows its
//!   node across scroll and zoom
//!
//! ## Quick Start
//!
//! ```ignore
//! use tool_graph_editor::{demo, ApiKey, GraphEditor, HttpCompletionService, PointerEvent, ShapeStore};
//!
//! let mut store = ShapeStore::new();
//! let pipeline = demo::agent_pipeline(&mut store);
//!
//! let service = HttpCompletionService::new(Default::default(), || {
//!     std::env::var("COMPLETION_API_KEY").ok().map(ApiKey::new)
//! });
//! let editor = GraphEditor::new(store, service);
//!
//! editor.edit_input(pipeline.input, "hi");
//! let outcome = editor.activate_agent(pipeline.agent).await?;
//!
//! editor.set_graph_mode(true);
//! editor.handle_pointer(&PointerEvent::down(600.0, 300.0));
//! ```
//!
//! ## Rust Helpers
//!
//! - [`find_connector_at`] - Hit-test node connectors in page coordinates
//! - [`find_node_at`] - Topmost node containing a point
//! - [`SelectionManager`] - Selected shape ids held by [`ShapeStore`]
//! - [`parse_completion`] - Decode a chat completion response body

pub mod shape;
pub mod topology;
pub mod graph;
pub mod selection;
pub mod canvas;
pub mod interaction;
pub mod behavior;
pub mod completion;
pub mod overlay;
pub mod config;
pub mod error;
pub mod editor;
pub mod demo;

// Re-export traits and functions
pub use hit_test::{
    find_connector_at, find_node_at, ConnectorGeometry, NodeGeometry, Point, Rect,
    SimpleConnectorGeometry, SimpleNodeGeometry,
};
pub use shape::{GraphEdge, GraphNode, NodeKind, NodeType, Shape, ShapeId, ShapeKind};
pub use topology::{TopologyResolver, ANCHOR_TOLERANCE};
pub use graph::{EdgeEnds, GraphIndex};
pub use selection::SelectionManager;
pub use canvas::{CanvasHost, ShapeStore, Viewport};
pub use interaction::{
    delete_selected_edges, ConnectionDrag, ConnectionInteraction, EditorKey, EventTarget,
    InteractionOutcome, InteractionState, PointerButton, PointerEvent, PointerEventKind,
};
pub use behavior::{node_view, AgentInput, NodeBody, NodeView};
pub use completion::{
    parse_completion, ApiKey, ChatMessage, CompletionConfig, CompletionRequest, CompletionService,
    CredentialProvider, HttpCompletionService,
};
pub use overlay::{EditOverlay, OverlayBinding, OverlayLayout};
pub use config::EditorConfig;
pub use error::{AgentError, CompletionError, LogNotifier, Notifier, UnknownNodeType};
pub use editor::{AgentOutcome, GraphEditor, KeyOutcome};
