//! Draft validation
//!
//! Checks run before a draft is sent for feedback. Pure functions only.

use serde::{Deserialize, Serialize};

/// Minimum trimmed length used by the strict variant
pub const DEFAULT_MIN_REFLECTION_CHARS: usize = 20;

/// Draft rejected before submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("Please write something meaningful before clicking 'Get Feedback'. Your reflections matter!")]
    EmptyInput,

    #[error("Your reflection seems a bit short. Try adding a few more details for better feedback! ({length}/{minimum} characters)")]
    TooShort { length: usize, minimum: usize },
}

/// Validate a draft against an optional minimum length
///
/// Length is counted in characters after trimming surrounding whitespace.
pub fn validate_draft(text: &str, min_chars: Option<usize>) -> Result<(), ValidationError> {
    let length = text.trim().chars().count();
    if length == 0 {
        return Err(ValidationError::EmptyInput);
    }
    match min_chars {
        Some(minimum) if length < minimum => Err(ValidationError::TooShort { length, minimum }),
        _ => Ok(()),
    }
}
