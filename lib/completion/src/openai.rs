//! OpenAI-compatible chat-completions backend.
//!
//! Posts the transcript to `/v1/chat/completions` with a fixed model
//! identifier and reads the first candidate's message content. Any
//! transport failure, non-2xx status, or candidate-free response is a
//! [`RemoteError`]; the response body of a failed call is surfaced as
//! the error detail rather than discarded.

use crate::backend::CompletionBackend;
use async_trait::async_trait;
use bestself_conversation::{Message, WireMessage};
use bestself_core::RemoteError;
use serde::{Deserialize, Serialize};

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Configuration for the OpenAI-compatible backend.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Base URL for the API.
    pub base_url: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// Bearer credential for the API.
    pub api_key: String,
}

impl OpenAiConfig {
    /// Creates a configuration with the default endpoint and model.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: api_key.into(),
        }
    }

    /// Overrides the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overrides the model identifier.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// Reply client for an OpenAI-compatible chat-completions API.
#[derive(Debug, Clone)]
pub struct OpenAiBackend {
    client: reqwest::Client,
    config: OpenAiConfig,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

impl OpenAiBackend {
    /// Creates a backend from configuration.
    #[must_use]
    pub fn new(config: OpenAiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    async fn complete(&self, transcript: &[Message]) -> Result<Message, RemoteError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: transcript.iter().map(WireMessage::from).collect(),
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| RemoteError::Transport {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), %detail, "completion request failed");
            return Err(RemoteError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        let body: ChatResponse =
            response
                .json()
                .await
                .map_err(|e| RemoteError::MalformedResponse {
                    reason: e.to_string(),
                })?;

        let content = body
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(RemoteError::EmptyResponse)?;

        Ok(Message::assistant(content))
    }
}
