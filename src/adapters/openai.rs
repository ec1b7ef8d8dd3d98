//! OpenAI-compatible chat-completions adapter.
//!
//! Endpoint: POST {base_url}/chat/completions
//! Auth: Bearer token

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ChatMessage, Completion, CompletionBackend, CompletionRequest};
use crate::domain::TokenUsage;
use crate::error::{ConvertError, Result, UpstreamError};

/// Default public endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Chat-completions client
pub struct OpenAiBackend {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

/// Request body for /chat/completions
#[derive(Debug, Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

/// Response from /chat/completions
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    model: String,
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<TokenUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Error envelope returned with non-success statuses
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl OpenAiBackend {
    /// Create a new client
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Build API URL
    fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<Completion> {
        let url = self.api_url("chat/completions");
        let body = ChatCompletionBody {
            model: &request.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format: request.json_mode.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };

        debug!(%url, model = %request.model, "Sending chat completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .timeout(request.timeout)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = parse_retry_after(response.headers());
            let text = response.text().await.unwrap_or_default();
            return Err(status_error(status.as_u16(), &text, retry_after));
        }

        let text = response.text().await.map_err(transport_error)?;
        parse_completion(&text)
    }

    async fn health_check(&self) -> Result<()> {
        let response = self
            .client
            .get(self.api_url("models"))
            .bearer_auth(&self.api_key)
            .timeout(Duration::from_secs(30))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = parse_retry_after(response.headers());
            let text = response.text().await.unwrap_or_default();
            return Err(status_error(status.as_u16(), &text, retry_after));
        }

        Ok(())
    }
}

/// Map a transport failure to an upstream error
fn transport_error(e: reqwest::Error) -> ConvertError {
    if e.is_timeout() {
        UpstreamError::Timeout.into()
    } else {
        UpstreamError::Unreachable(e.to_string()).into()
    }
}

/// Map a non-success status to an error kind
pub(crate) fn status_error(status: u16, body: &str, retry_after: Option<Duration>) -> ConvertError {
    let message = error_message(body).unwrap_or_else(|| format!("HTTP {}", status));

    match status {
        401 | 403 => ConvertError::Authentication(message),
        429 => UpstreamError::RateLimited {
            message,
            retry_after,
        }
        .into(),
        _ => UpstreamError::Status { status, message }.into(),
    }
}

/// Extract the service's error message, falling back to the raw body
fn error_message(body: &str) -> Option<String> {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        return Some(envelope.error.message);
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.chars().take(200).collect())
    }
}

/// Retry-After in delta-seconds form (HTTP dates are ignored)
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

/// Strictly decode a successful response body
pub(crate) fn parse_completion(body: &str) -> Result<Completion> {
    let response: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|e| ConvertError::malformed(format!("invalid completion body: {}", e)))?;

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ConvertError::malformed("response has no choices"))?;

    let content = choice
        .message
        .content
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| ConvertError::malformed("response message has no content"))?;

    Ok(Completion {
        content,
        finish_reason: choice.finish_reason,
        model: response.model,
        usage: response.usage,
    })
}
