use thiserror::Error;

/// Reasons an agent activation could not run or could not reach the
/// completion service. None of them is fatal to the editor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AgentError {
    #[error("agent node {agent} has no incoming connection")]
    MissingConnection { agent: i32 },

    #[error("incoming edge {edge} of agent node {agent} does not start at an input node")]
    MissingSource { agent: i32, edge: i32 },

    #[error("input node {input} feeding agent node {agent} is empty")]
    EmptyInput { agent: i32, input: i32 },

    #[error("completion request for agent node {agent} failed: {reason}")]
    RemoteCallFailure { agent: i32, reason: String },
}

impl AgentError {
    /// Text shown to the user in the blocking notice.
    pub fn notice(&self) -> &'static str {
        match self {
            AgentError::MissingConnection { .. } => "No input node connected!",
            AgentError::MissingSource { .. } => "Input node not found!",
            AgentError::EmptyInput { .. } => "Input is empty!",
            AgentError::RemoteCallFailure { .. } => "API error.",
        }
    }
}

/// Failures of a single completion request.
#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("no API credential configured")]
    MissingCredential,

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("service responded with status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Decode(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown node type '{0}'")]
pub struct UnknownNodeType(pub String);

/// Sink for blocking user notices raised by the editor.
pub trait Notifier {
    fn notify(&self, error: &AgentError);
}

/// Notifier that only logs the notice.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, error: &AgentError) {
        tracing::warn!(notice = error.notice(), "{error}");
    }
}

impl<F> Notifier for F
where
    F: Fn(&AgentError),
{
    fn notify(&self, error: &AgentError) {
        self(error)
    }
}
