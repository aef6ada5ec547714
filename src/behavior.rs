//! Per-node-type rendering data and behavior.
//!
//! Rendering itself happens in the UI; this module turns a node into a
//! [`NodeView`] describing what to draw, and implements the synchronous
//! steps of the node behaviors. The asynchronous agent run that strings the
//! agent steps together lives in [`GraphEditor::activate_agent`](crate::GraphEditor::activate_agent).

use crate::canvas::CanvasHost;
use crate::config::EditorConfig;
use crate::error::AgentError;
use crate::graph::GraphIndex;
use crate::hit_test::{Point, Rect};
use crate::shape::{GraphNode, NodeKind, NodeType, ShapeId};
use slint::{Color, SharedString};

pub const RUN_LABEL: &str = "Run";
pub const RUNNING_LABEL: &str = "Running...";

/// The interactive content of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeBody {
    /// Editable single-line field (input nodes).
    TextField { value: SharedString, placeholder: SharedString },
    /// Button starting the agent; disabled while it runs.
    Trigger { label: SharedString, enabled: bool },
    /// Read-only result text (output nodes).
    Display { text: SharedString },
    /// Just the node's label (if / success / failure).
    Label { text: SharedString },
}

/// Everything the UI needs to draw one node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeView {
    pub id: ShapeId,
    pub node_type: NodeType,
    pub bounds: Rect,
    pub color: Color,
    pub body: NodeBody,
    /// Center of the connector handle (the source anchor).
    pub connector: Point,
    pub connector_radius: f32,
    /// Double-clicking the body opens the inline edit overlay.
    pub opens_overlay: bool,
}

pub fn node_view(id: ShapeId, node: &GraphNode, config: &EditorConfig) -> NodeView {
    let body = match &node.kind {
        NodeKind::Input { value } => NodeBody::TextField {
            value: value.clone(),
            placeholder: config.input_placeholder.as_str().into(),
        },
        NodeKind::Agent { running } => NodeBody::Trigger {
            label: if *running { RUNNING_LABEL } else { RUN_LABEL }.into(),
            enabled: !*running,
        },
        NodeKind::Output { value } => NodeBody::Display {
            text: value
                .clone()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| config.output_placeholder.as_str().into()),
        },
        NodeKind::If | NodeKind::Success | NodeKind::Failure => {
            NodeBody::Label { text: node.label.clone() }
        }
    };

    NodeView {
        id,
        node_type: node.node_type(),
        bounds: node.bounds(),
        color: node.color,
        body,
        connector: node.source_anchor(),
        connector_radius: config.connector_radius,
        opens_overlay: node.node_type() == NodeType::Input,
    }
}

/// Keystroke in an input node's field: store the text as is.
pub fn set_input_value<H: CanvasHost>(host: &mut H, node_id: ShapeId, text: &str) -> bool {
    let mut written = false;
    host.update_node(node_id, |node| {
        if let NodeKind::Input { value } = &mut node.kind {
            *value = text.into();
            written = true;
        }
    });
    written
}

/// Set the running flag of an agent node. No-op for anything else, including
/// a node deleted or retyped while its request was outstanding.
pub fn set_running<H: CanvasHost>(host: &mut H, agent: ShapeId, running: bool) -> bool {
    let mut written = false;
    host.update_node(agent, |node| {
        if let NodeKind::Agent { running: r } = &mut node.kind {
            *r = running;
            written = true;
        }
    });
    written
}

/// The input feeding an agent, resolved through its first incoming edge.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentInput {
    pub edge: ShapeId,
    pub input_node: ShapeId,
    pub prompt: String,
}

pub fn resolve_agent_input<H: CanvasHost>(
    host: &H,
    index: &GraphIndex,
    agent: ShapeId,
) -> Result<AgentInput, AgentError> {
    let edge = *index
        .incoming(agent)
        .first()
        .ok_or(AgentError::MissingConnection { agent })?;

    let (input_node, node) = index
        .source_of(edge)
        .and_then(|id| host.node(id).map(|n| (id, n)))
        .filter(|(_, n)| n.node_type() == NodeType::Input)
        .ok_or(AgentError::MissingSource { agent, edge })?;

    let prompt = node.input_value().unwrap_or_default();
    if prompt.is_empty() {
        return Err(AgentError::EmptyInput { agent, input: input_node });
    }

    Ok(AgentInput { edge, input_node, prompt: prompt.to_string() })
}

/// First output node reached through one of the agent's outgoing edges.
pub fn resolve_output_target<H: CanvasHost>(host: &H, index: &GraphIndex, agent: ShapeId) -> Option<ShapeId> {
    index
        .outgoing(agent)
        .iter()
        .filter_map(|&edge| index.target_of(edge))
        .find(|&target| host.node(target).is_some_and(|n| n.node_type() == NodeType::Output))
}

/// Write an agent result into an output node.
pub fn deliver_result<H: CanvasHost>(host: &mut H, output: ShapeId, text: &str) -> bool {
    let mut written = false;
    host.update_node(output, |node| {
        if let NodeKind::Output { value } = &mut node.kind {
            *value = Some(text.into());
            written = true;
        }
    });
    written
}
