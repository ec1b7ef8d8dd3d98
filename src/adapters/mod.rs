//! Adapter interfaces for completion services.
//!
//! Adapters provide a unified interface for sending chat prompts to a
//! remote text-generation API. The converter only talks to the
//! [`CompletionBackend`] trait, so tests can substitute a scripted backend.

pub mod openai;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::TokenUsage;
use crate::error::Result;

// Re-export the OpenAI adapter
pub use openai::OpenAiBackend;

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message of a chat prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A single completion request
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: Option<u32>,

    /// Ask the service to constrain output to a JSON object
    pub json_mode: bool,

    /// Per-request timeout
    pub timeout: Duration,
}

/// Output from a completion backend
#[derive(Debug, Clone)]
pub struct Completion {
    /// The generated text
    pub content: String,

    /// Why generation stopped ("stop", "length", ...), if reported
    pub finish_reason: Option<String>,

    /// Model that actually served the request
    pub model: String,

    /// Tokens used (if available)
    pub usage: Option<TokenUsage>,
}

impl Completion {
    /// Create a completion with just content
    pub fn new(content: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            finish_reason: Some("stop".to_string()),
            model: model.into(),
            usage: None,
        }
    }

    /// Generation stopped at the token limit
    pub fn is_truncated(&self) -> bool {
        self.finish_reason.as_deref() == Some("length")
    }
}

/// Trait for completion services
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Human-readable backend name
    fn name(&self) -> &str;

    /// Send one prompt and return the generated text
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion>;

    /// Verify the service is reachable and accepts the credentials
    async fn health_check(&self) -> Result<()>;
}
