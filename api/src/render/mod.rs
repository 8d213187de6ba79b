//! Page rendering
//!
//! Builds the reflection page from a session snapshot. Output is HTML-escaped
//! by minijinja because the template name ends in `.html`.

mod template;

use minijinja::Environment;
use serde::Serialize;

use reflect_core::prompts::selector_entries;
use reflect_core::{FeedbackStyle, SessionError, SessionSnapshot, RANDOM_QUESTION};

const PAGE_TEMPLATE: &str = "page.html";

/// Characters of the reflection shown in a history heading
pub const HISTORY_PREVIEW_CHARS: usize = 60;

/// Shown under a feedback service failure
pub const SERVICE_ERROR_HINT: &str = "If the issue persists, your input might be too long or contain sensitive information that the model cannot process.";

/// Banner shown above the journal after an action
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Notice {
    pub level: &'static str,
    pub message: String,
    pub hint: Option<&'static str>,
}

impl Notice {
    pub fn success(feedback: impl Into<String>) -> Self {
        Self {
            level: "success",
            message: feedback.into(),
            hint: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: "warning",
            message: message.into(),
            hint: None,
        }
    }

    /// Map a failed submission to a warning or an error banner
    pub fn from_error(error: &SessionError) -> Self {
        match error {
            SessionError::Validation(v) => Self::warning(v.to_string()),
            SessionError::FeedbackService(_) => Self {
                level: "error",
                message: error.to_string(),
                hint: Some(SERVICE_ERROR_HINT),
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct QuestionOption {
    value: &'static str,
    selected: bool,
}

#[derive(Debug, Serialize)]
struct StyleOption {
    slug: &'static str,
    label: &'static str,
    selected: bool,
}

#[derive(Debug, Serialize)]
struct HistoryItem {
    heading: String,
    question: String,
    reflection: String,
    style: &'static str,
    feedback: String,
}

#[derive(Debug, Serialize)]
struct PageContext {
    questions: Vec<QuestionOption>,
    random_notice: Option<String>,
    question: String,
    draft: String,
    draft_chars: usize,
    styles: Vec<StyleOption>,
    notice: Option<Notice>,
    journal: Vec<HistoryItem>,
}

pub struct PageRenderer {
    env: Environment<'static>,
}

impl std::fmt::Debug for PageRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageRenderer").finish_non_exhaustive()
    }
}

impl PageRenderer {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template(PAGE_TEMPLATE, template::PAGE_HTML)?;
        Ok(Self { env })
    }

    /// Render the page for `snapshot` with the chosen style and an optional banner
    pub fn render(
        &self,
        snapshot: &SessionSnapshot,
        style: FeedbackStyle,
        notice: Option<Notice>,
    ) -> Result<String, minijinja::Error> {
        let questions = selector_entries()
            .into_iter()
            .map(|value| QuestionOption {
                value,
                selected: if snapshot.question_is_random {
                    value == RANDOM_QUESTION
                } else {
                    value == snapshot.question
                },
            })
            .collect();

        let styles = FeedbackStyle::ALL
            .iter()
            .map(|s| StyleOption {
                slug: s.slug(),
                label: s.label(),
                selected: *s == style,
            })
            .collect();

        let journal = snapshot
            .journal
            .iter()
            .map(|entry| HistoryItem {
                heading: format!(
                    "{} · {}",
                    entry.timestamp.format("%Y-%m-%d %H:%M"),
                    entry.preview(HISTORY_PREVIEW_CHARS)
                ),
                question: entry.question.clone(),
                reflection: entry.reflection.clone(),
                style: entry.feedback_style.label(),
                feedback: entry.feedback.clone(),
            })
            .collect();

        let context = PageContext {
            questions,
            random_notice: snapshot
                .question_is_random
                .then(|| snapshot.question.clone()),
            question: snapshot.question.clone(),
            draft: snapshot.draft.clone(),
            draft_chars: snapshot.draft_chars,
            styles,
            notice,
            journal,
        };

        self.env.get_template(PAGE_TEMPLATE)?.render(context)
    }
}
