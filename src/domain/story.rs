//! Validated story input.

use std::fmt;

use crate::error::ValidationError;

/// Narrative text to break down into scenes and shots.
///
/// Guaranteed non-empty after trimming. The text itself is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryText(String);

impl StoryText {
    /// Validate and wrap raw text
    pub fn new(text: impl Into<String>) -> Result<Self, ValidationError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ValidationError::Empty);
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Size in bytes (what input limits are measured in)
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl AsRef<str> for StoryText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoryText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
