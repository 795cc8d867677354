//! Completion gateway and its OpenAI-compatible client.
//!
//! Nothing outside this module talks to the completion API. Handlers hold an
//! `Arc<dyn CompletionGateway>`; `LlmClient` is the production implementation.
//!
//! A failed call is returned as-is. There is no retry: callers degrade to
//! their fallback instead.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::Config;

pub mod prompts;
#[cfg(test)]
pub mod stub;

/// Output length cap shared by every operation.
pub const MAX_TOKENS: u32 = 1000;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Role of a turn in the message list sent to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Sampling options, fixed per operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionOptions {
    pub temperature: f32,
    pub max_tokens: u32,
    /// Ask the service for a JSON object response.
    pub json_response: bool,
}

/// The completion collaborator. Implement this to swap backends without
/// touching handlers. Carried in `AppState` as `Arc<dyn CompletionGateway>`.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    async fn complete(
        &self,
        system: &str,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: Role,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// OpenAI-compatible Chat Completions client.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    completions_url: String,
    model: String,
}

impl LlmClient {
    pub fn new(config: &Config) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.llm_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key: config.openai_api_key.clone(),
            completions_url: format!(
                "{}/chat/completions",
                config.openai_base_url.trim_end_matches('/')
            ),
            model: config.model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionGateway for LlmClient {
    async fn complete(
        &self,
        system: &str,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<String, LlmError> {
        let mut wire = Vec::with_capacity(messages.len() + 1);
        wire.push(WireMessage {
            role: Role::System,
            content: system,
        });
        wire.extend(messages.iter().map(|m| WireMessage {
            role: m.role,
            content: &m.content,
        }));

        let request_body = CompletionRequest {
            model: &self.model,
            messages: wire,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            response_format: options.json_response.then_some(ResponseFormat {
                format_type: "json_object",
            }),
        };

        let response = self
            .client
            .post(&self.completions_url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Try to parse error message
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let completion: CompletionResponse = serde_json::from_str(&body)?;

        if let Some(usage) = &completion.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(LlmError::EmptyContent)
    }
}
