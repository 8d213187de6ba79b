//! API Models
//!
//! Request and response bodies for the JSON endpoints, plus the HTML form
//! payloads.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use reflect_core::{JournalEntry, ValidationError};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub version: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Body of `POST /api/sessions/:id/question`
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionRequest {
    /// Literal question, or "random" / "Random Question"
    pub choice: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestionResponse {
    pub question: String,
    pub random: bool,
}

/// Body of `PUT /api/sessions/:id/draft`
#[derive(Debug, Clone, Deserialize)]
pub struct DraftRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DraftResponse {
    pub draft_chars: usize,
}

/// Body of `POST /api/sessions/:id/validate`; validates the stored draft when `text` is absent
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValidateRequest {
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidateResponse {
    pub valid: bool,
    pub error: Option<ValidationError>,
    pub message: Option<String>,
}

/// Body of `POST /api/sessions/:id/feedback`
///
/// `question` and `draft` replace the session's values before submitting.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedbackRequest {
    pub question: Option<String>,
    pub draft: Option<String>,
    pub style: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedbackResponse {
    pub feedback: String,
    pub entry: JournalEntry,
    pub journal_len: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateSessionResponse {
    pub id: Uuid,
    pub question: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestionsResponse {
    pub questions: Vec<String>,
    pub random_choice: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StyleInfo {
    pub slug: String,
    pub label: String,
}

/// Error body returned by every JSON endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub kind: String,
    pub message: String,
}

/// Fields posted by the reflection form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReflectForm {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub draft: String,
    #[serde(default)]
    pub style: String,
}
