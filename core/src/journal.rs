//! Reflection journal
//!
//! In-memory record of completed exchanges for one session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::prompts::FeedbackStyle;

/// One completed reflection exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub timestamp: DateTime<Utc>,
    pub question: String,
    pub reflection: String,
    pub feedback_style: FeedbackStyle,
    pub feedback: String,
}

impl JournalEntry {
    pub fn new(
        timestamp: DateTime<Utc>,
        question: impl Into<String>,
        reflection: impl Into<String>,
        feedback_style: FeedbackStyle,
        feedback: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            question: question.into(),
            reflection: reflection.into(),
            feedback_style,
            feedback: feedback.into(),
        }
    }

    /// Reflection shortened to `max_chars` characters for history headings
    pub fn preview(&self, max_chars: usize) -> String {
        truncate_for_display(&self.reflection, max_chars)
    }
}

/// Truncate on a character boundary, appending an ellipsis when shortened
pub fn truncate_for_display(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.truncate(out.trim_end().len());
    out.push('…');
    out
}

/// Append-only list of entries, cleared only as a whole
#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: Vec<JournalEntry>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: JournalEntry) {
        self.entries.push(entry);
    }

    /// Most recent first
    pub fn list(&self) -> Vec<JournalEntry> {
        self.entries.iter().rev().cloned().collect()
    }

    pub fn latest(&self) -> Option<&JournalEntry> {
        self.entries.last()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
