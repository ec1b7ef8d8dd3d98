//! shotscene - Convert narrative text into film scenes and shots
//!
//! Sends a story to an OpenAI-compatible chat-completions API and decodes
//! the answer into an ordered list of scenes, each made of shots with
//! framing, camera notes, description and dialogue.
//!
//! # Modules
//!
//! - `adapters`: Completion service integrations (OpenAI-compatible HTTP)
//! - `core`: Conversion logic (Converter, prompt, decode, retry, limits)
//! - `domain`: Data structures (StoryText, Scene, Shot, ShotList)
//! - `config`: Explicit conversion configuration and its sources
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```no_run
//! use shotscene::{convert, ConvertConfig};
//!
//! # async fn run() -> Result<(), shotscene::ConvertError> {
//! let config = ConvertConfig::new("sk-...", "gpt-4o-mini");
//! let shots = convert("A man walks into a bar. He orders a drink.", &config).await?;
//!
//! for shot in shots.shots() {
//!     println!("{} {} {}", shot.label(), shot.shot_type, shot.description);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ```bash
//! echo "A man walks into a bar. He orders a drink." | shotscene convert --format markdown
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod error;

// Re-export main types at crate root for convenience
pub use adapters::{CompletionBackend, OpenAiBackend};
pub use config::ConvertConfig;
pub use crate::core::{convert, Converter, RetryPolicy};
pub use domain::{OutputFormat, Scene, Shot, ShotList, ShotType, StoryText, TokenUsage};
pub use error::{ConvertError, UpstreamError, ValidationError};
