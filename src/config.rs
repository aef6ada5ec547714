use crate::completion::CompletionConfig;
use crate::shape::{NodeType, CONNECTOR_RADIUS};
use crate::topology::ANCHOR_TOLERANCE;
use serde::{Deserialize, Serialize};

/// Editor settings. Every field has a default, so a partial JSON document
/// is a valid configuration.
///
/// Credentials are deliberately absent; see
/// [`CredentialProvider`](crate::completion::CredentialProvider).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Per-axis anchor matching distance in page units. Not zoom-scaled.
    pub anchor_tolerance: f32,
    /// Hit radius of a node's connector handle in page units.
    pub connector_radius: f32,
    /// Type of nodes spawned by clicking empty surface.
    pub default_node_type: NodeType,
    pub input_placeholder: String,
    /// Shown by output nodes that have not received a result.
    pub output_placeholder: String,
    /// Result delivered downstream when the completion call fails.
    pub remote_failure_text: String,
    pub completion: CompletionConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            anchor_tolerance: ANCHOR_TOLERANCE,
            connector_radius: CONNECTOR_RADIUS,
            default_node_type: NodeType::Agent,
            input_placeholder: "Enter query...".into(),
            output_placeholder: "No output.".into(),
            remote_failure_text: "API error.".into(),
            completion: CompletionConfig::default(),
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
