//! Common test utilities for integration tests.

#![allow(dead_code)]

pub mod harness;

use futures::channel::oneshot;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::future::Future;
use std::rc::Rc;
use tool_graph_editor::{AgentError, CompletionError, CompletionRequest, CompletionService, Notifier};

/// Records every notice raised by the editor.
#[derive(Default, Clone)]
pub struct RecordingNotifier {
    pub notices: Rc<RefCell<Vec<AgentError>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.notices.borrow().len()
    }

    pub fn texts(&self) -> Vec<&'static str> {
        self.notices.borrow().iter().map(AgentError::notice).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, error: &AgentError) {
        self.notices.borrow_mut().push(error.clone());
    }
}

enum Reply {
    Now(Result<String, u16>),
    Gated(oneshot::Receiver<Result<String, u16>>),
}

/// Completion service answering from a script.
///
/// Clones share the script, so a test can keep a handle after moving the
/// service into the editor. Unscripted calls answer "No answer.".
#[derive(Default, Clone)]
pub struct ScriptedCompletion {
    replies: Rc<RefCell<VecDeque<Reply>>>,
    /// Prompt of every request, in call order.
    pub prompts: Rc<RefCell<Vec<String>>>,
}

impl ScriptedCompletion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(&self, text: &str) {
        self.replies.borrow_mut().push_back(Reply::Now(Ok(text.to_string())));
    }

    pub fn fail(&self, status: u16) {
        self.replies.borrow_mut().push_back(Reply::Now(Err(status)));
    }

    /// Queue a reply that stays pending until the returned sender fires.
    pub fn gate(&self) -> oneshot::Sender<Result<String, u16>> {
        let (tx, rx) = oneshot::channel();
        self.replies.borrow_mut().push_back(Reply::Gated(rx));
        tx
    }

    pub fn call_count(&self) -> usize {
        self.prompts.borrow().len()
    }
}

impl CompletionService for ScriptedCompletion {
    fn complete(&self, request: CompletionRequest) -> impl Future<Output = Result<String, CompletionError>> {
        self.prompts
            .borrow_mut()
            .push(request.prompt().unwrap_or_default().to_string());
        let reply = self
            .replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Reply::Now(Ok("No answer.".to_string())));

        async move {
            let result = match reply {
                Reply::Now(result) => result,
                // A dropped sender behaves like an unreachable service.
                Reply::Gated(rx) => rx.await.unwrap_or(Err(503)),
            };
            result.map_err(CompletionError::Status)
        }
    }
}
