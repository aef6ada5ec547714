//! Client side of the remote text-completion service used by agent nodes.
//!
//! The wire format is the OpenAI-compatible chat completion API. Credentials
//! are never part of the configuration that gets serialized; they are pulled
//! from an injected [`CredentialProvider`] each time a request is made.

use crate::error::CompletionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;

pub const DEFAULT_ENDPOINT: &str = "https://api.deepseek.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "deepseek-chat";

/// Result text used when the service answers without any content.
pub const NO_ANSWER: &str = "No answer.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// One completion request. Agent nodes always send a single user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
}

impl CompletionRequest {
    pub fn user(prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage { role: "user".into(), content: prompt.into() }],
        }
    }

    /// Content of the first user message.
    pub fn prompt(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.role == "user")
            .map(|m| m.content.as_str())
    }
}

/// Asynchronous text completion.
///
/// Futures are polled on the UI thread, so no `Send` bound is required.
pub trait CompletionService {
    fn complete(
        &self,
        request: CompletionRequest,
    ) -> impl Future<Output = Result<String, CompletionError>>;
}

/// Secret API key. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Supplies the API key at call time.
pub trait CredentialProvider {
    fn api_key(&self) -> Option<ApiKey>;
}

impl<F> CredentialProvider for F
where
    F: Fn() -> Option<ApiKey>,
{
    fn api_key(&self) -> Option<ApiKey> {
        self()
    }
}

impl CredentialProvider for ApiKey {
    fn api_key(&self) -> Option<ApiKey> {
        Some(self.clone())
    }
}

/// Where and which model to call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    pub endpoint: String,
    pub model: String,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self { endpoint: DEFAULT_ENDPOINT.into(), model: DEFAULT_MODEL.into() }
    }
}

#[derive(Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Extract the answer from a chat completion response body.
///
/// A well-formed response without content yields [`NO_ANSWER`].
pub fn parse_completion(body: &str) -> Result<String, CompletionError> {
    let response: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|e| CompletionError::Decode(e.to_string()))?;

    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .filter(|c| !c.is_empty());

    Ok(content.unwrap_or_else(|| NO_ANSWER.to_string()))
}

/// HTTP implementation of [`CompletionService`].
pub struct HttpCompletionService<P> {
    client: reqwest::Client,
    config: CompletionConfig,
    credentials: P,
}

impl<P: CredentialProvider> HttpCompletionService<P> {
    pub fn new(config: CompletionConfig, credentials: P) -> Self {
        Self::with_client(reqwest::Client::new(), config, credentials)
    }

    pub fn with_client(client: reqwest::Client, config: CompletionConfig, credentials: P) -> Self {
        Self { client, config, credentials }
    }

    pub fn config(&self) -> &CompletionConfig {
        &self.config
    }
}

impl<P: CredentialProvider> CompletionService for HttpCompletionService<P> {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        let key = self
            .credentials
            .api_key()
            .ok_or(CompletionError::MissingCredential)?;

        tracing::debug!(endpoint = %self.config.endpoint, model = %self.config.model, "sending completion request");

        let body = ChatCompletionBody { model: &self.config.model, messages: &request.messages };
        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(key.expose())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CompletionError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        parse_completion(&text)
    }
}
