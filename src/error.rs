//! Error types for conversions.
//!
//! Every failure surfaces to the caller as one of three kinds:
//! input validation, authentication, or an upstream service failure.

use std::time::Duration;

use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T, E = ConvertError> = std::result::Result<T, E>;

/// Top-level conversion error
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Upstream service error: {0}")]
    Upstream(#[from] UpstreamError),
}

impl ConvertError {
    /// Whether the failed request is worth repeating
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Upstream(e) => e.is_retryable(),
            Self::Validation(_) | Self::Authentication(_) => false,
        }
    }

    /// Server-provided wait hint, if any
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Upstream(UpstreamError::RateLimited { retry_after, .. }) => *retry_after,
            _ => None,
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::Upstream(UpstreamError::Malformed(reason.into()))
    }
}

/// Input rejected before any request is made
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("story text is empty")]
    Empty,

    #[error("story text too large: {actual} > {limit} bytes")]
    TooLarge { actual: usize, limit: usize },
}

/// Failures of the remote completion service
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("service unreachable: {0}")]
    Unreachable(String),

    #[error("request timed out")]
    Timeout,

    #[error("rate limited: {message}")]
    RateLimited {
        message: String,
        retry_after: Option<Duration>,
    },

    #[error("service returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl UpstreamError {
    /// Transport failures, rate limits and 5xx responses are transient
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Unreachable(_) | Self::Timeout | Self::RateLimited { .. } => true,
            Self::Status { status, .. } => *status >= 500,
            Self::Malformed(_) => false,
        }
    }
}
