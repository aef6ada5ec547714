//! Static example diagrams.
//!
//! Edges are placed exactly on the anchors, so
//! [`GraphIndex::from_shapes`](crate::GraphIndex::from_shapes) (and
//! therefore [`GraphEditor::new`](crate::GraphEditor::new)) picks up their
//! connectivity.

use crate::canvas::CanvasHost;
use crate::shape::{GraphEdge, GraphNode, NodeType, ShapeId};

/// Ids of the shapes created by [`agent_pipeline`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentPipeline {
    pub input: ShapeId,
    pub agent: ShapeId,
    pub output: ShapeId,
    pub input_edge: ShapeId,
    pub output_edge: ShapeId,
}

/// input → agent → output, one row, 80 units apart.
pub fn agent_pipeline<H: CanvasHost>(host: &mut H) -> AgentPipeline {
    let input = place(host, GraphNode::new(NodeType::Input).at(0.0, 0.0));
    let agent = place(host, GraphNode::new(NodeType::Agent).at(200.0, 0.0));
    let output = place(host, GraphNode::new(NodeType::Output).at(400.0, 0.0));
    let input_edge = link(host, input, agent);
    let output_edge = link(host, agent, output);
    AgentPipeline { input, agent, output, input_edge, output_edge }
}

/// Ids of the shapes created by [`tool_chain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolChain {
    pub trigger: ShapeId,
    pub agent: ShapeId,
    pub condition: ShapeId,
    pub success: ShapeId,
    pub failure: ShapeId,
    pub edges: [ShapeId; 4],
}

/// Chat trigger → agent → if, branching to success and failure.
pub fn tool_chain<H: CanvasHost>(host: &mut H) -> ToolChain {
    let trigger = place(
        host,
        GraphNode::new(NodeType::Input).at(0.0, 60.0).with_label("When chat message received"),
    );
    let agent = place(host, GraphNode::new(NodeType::Agent).at(200.0, 60.0));
    let condition = place(host, GraphNode::new(NodeType::If).at(400.0, 60.0));
    let success = place(host, GraphNode::new(NodeType::Success).at(600.0, 0.0));
    let failure = place(host, GraphNode::new(NodeType::Failure).at(600.0, 120.0));

    let edges = [
        link(host, trigger, agent),
        link(host, agent, condition),
        link(host, condition, success),
        link(host, condition, failure),
    ];
    ToolChain { trigger, agent, condition, success, failure, edges }
}

fn place<H: CanvasHost>(host: &mut H, node: GraphNode) -> ShapeId {
    host.create_shape(node.into())
}

fn link<H: CanvasHost>(host: &mut H, from: ShapeId, to: ShapeId) -> ShapeId {
    let start = host.node(from).map(|n| n.source_anchor()).unwrap_or_default();
    let end = host.node(to).map(|n| n.target_anchor()).unwrap_or_default();
    host.create_shape(GraphEdge::between(start, end).into())
}
