//! Domain types for shot lists.
//!
//! This module contains the core data structures:
//! - StoryText: Validated narrative input
//! - Scene / Shot: The film breakdown
//! - ShotList: Ordered result of a conversion, with output formats

pub mod render;
pub mod shot;
pub mod story;

// Re-export commonly used types
pub use render::OutputFormat;
pub use shot::{Scene, Shot, ShotList, ShotType, TokenUsage};
pub use story::StoryText;
