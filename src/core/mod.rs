//! Core conversion logic.
//!
//! This module contains:
//! - Converter: Story text to shot list via a completion backend
//! - Prompt: Chat messages requesting the breakdown
//! - Decode: Strict schema decode of the model's answer
//! - Retry / Limits: Backoff policy and input validation

pub mod converter;
pub mod decode;
pub mod limits;
pub mod prompt;
pub mod retry;

// Re-export commonly used types
pub use converter::{convert, Converter};
pub use decode::decode_breakdown;
pub use limits::InputLimits;
pub use prompt::build_messages;
pub use retry::RetryPolicy;
