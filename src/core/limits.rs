//! Input limits applied before any request is made.

use serde::{Deserialize, Serialize};

use crate::domain::StoryText;
use crate::error::ValidationError;

/// Limits on story input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputLimits {
    /// Maximum input size in bytes (default: 100KB)
    #[serde(default = "default_max_input_bytes")]
    pub max_input_bytes: usize,
}

fn default_max_input_bytes() -> usize {
    100 * 1024
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            max_input_bytes: default_max_input_bytes(),
        }
    }
}

impl InputLimits {
    /// Validate raw text, returning the story on success
    pub fn validate(&self, text: &str) -> Result<StoryText, ValidationError> {
        let story = StoryText::new(text)?;

        if story.len() > self.max_input_bytes {
            return Err(ValidationError::TooLarge {
                actual: story.len(),
                limit: self.max_input_bytes,
            });
        }

        Ok(story)
    }
}
