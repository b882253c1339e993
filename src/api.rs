//! LLM chat-completion interaction.
//!
//! This module provides the seam between the summarizer and an
//! OpenAI-compatible `/v1/chat/completions` endpoint.
//!
//! # Architecture
//!
//! - [`AskAsync`]: core trait; one system message plus one user message in,
//!   one completion text out
//! - [`OpenAiClient`]: the HTTP implementation, configured from
//!   [`CompletionConfig`]
//!
//! There is no retry and no explicit timeout: a request waits as long as the
//! HTTP client's default allows, and any failure is returned to the caller
//! to be turned into a user-facing message.

use crate::config::CompletionConfig;
use crate::error::{ApiError, ApiResult};
use crate::utils::truncate_for_log;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Trait for async LLM interaction.
///
/// Implementors send a system persona and a user prompt to a language model
/// and return the text of its single completion.
pub trait AskAsync {
    /// Send one completion request.
    ///
    /// # Arguments
    ///
    /// * `system` - The persona / instruction message
    /// * `user` - The prompt content
    ///
    /// # Returns
    ///
    /// The completion text, or an [`ApiError`] describing why there is none.
    fn ask(&self, system: &str, user: &str) -> impl Future<Output = ApiResult<String>> + Send;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Extract the first choice's text from a chat-completion body.
pub fn parse_completion(body: &str) -> ApiResult<String> {
    let response: ChatResponse = serde_json::from_str(body)?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|text| !text.trim().is_empty())
        .ok_or(ApiError::EmptyCompletion)
}

/// Pull the human-readable message out of an OpenAI-style error body,
/// falling back to the raw (truncated) body.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) if !envelope.error.message.is_empty() => envelope.error.message,
        _ => truncate_for_log(body, 300),
    }
}

/// Chat-completion client for OpenAI-compatible APIs.
///
/// Holds the API key, model and sampling temperature for the lifetime of the
/// process; nothing is read from the environment per request.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl OpenAiClient {
    /// Create a client from the completion settings and an API key.
    ///
    /// The underlying `reqwest::Client` keeps its default (unbounded)
    /// timeout.
    pub fn new(config: &CompletionConfig, api_key: String) -> Self {
        Self {
            client: Client::new(),
            endpoint: config.endpoint.clone(),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
        }
    }
}

impl AskAsync for OpenAiClient {
    #[instrument(level = "info", skip_all, fields(model = %self.model))]
    async fn ask(&self, system: &str, user: &str) -> ApiResult<String> {
        let t0 = Instant::now();
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.temperature,
        };
        debug!(prompt_bytes = user.len(), "Sending completion request");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let dt = t0.elapsed();

        if !status.is_success() {
            let message = error_message(&body);
            warn!(%status, elapsed_ms = dt.as_millis() as u64, error = %message, "Completion API call failed");
            return Err(ApiError::from_status(status, message));
        }

        let text = parse_completion(&body)?;
        info!(
            elapsed_ms = dt.as_millis() as u64,
            completion_bytes = text.len(),
            "Completion received"
        );
        Ok(text)
    }
}
