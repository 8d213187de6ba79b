//! Reflection Session Manager
//!
//! One `ReflectionSession` per interactive user session. It owns the draft,
//! the active question and the journal, and is created at session start and
//! dropped at session end. Every user action maps to one method here.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::journal::{Journal, JournalEntry};
use crate::llm::LlmAdapter;
use crate::prompts::{compose_feedback_prompt, default_question, FeedbackStyle, QuestionChoice};
use crate::validation::{validate_draft, ValidationError, DEFAULT_MIN_REFLECTION_CHARS};

/// How much `clear_session` discards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetScope {
    /// Draft, last feedback, journal and question selection
    #[default]
    Full,
    /// Draft and last feedback only; the journal survives
    DraftOnly,
}

/// Per-session behaviour switches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Minimum trimmed draft length; `None` or `Some(0)` disables the check
    pub min_reflection_chars: Option<usize>,
    pub reset_scope: ResetScope,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            min_reflection_chars: Some(DEFAULT_MIN_REFLECTION_CHARS),
            reset_scope: ResetScope::Full,
        }
    }
}

impl SessionSettings {
    /// Effective threshold
    pub fn min_chars(&self) -> Option<usize> {
        self.min_reflection_chars.filter(|n| *n > 0)
    }
}

/// Session operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("An error occurred while generating feedback: {0}. Please try again later.")]
    FeedbackService(String),
}

/// Serializable view of a session for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub question: String,
    pub question_is_random: bool,
    pub draft: String,
    pub draft_chars: usize,
    pub last_feedback: Option<String>,
    pub journal: Vec<JournalEntry>,
}

#[derive(Debug, Clone)]
pub struct ReflectionSession {
    id: Uuid,
    created_at: DateTime<Utc>,
    settings: SessionSettings,
    draft: String,
    question: String,
    question_is_random: bool,
    last_feedback: Option<String>,
    journal: Journal,
}

impl ReflectionSession {
    pub fn new(settings: SessionSettings) -> Self {
        Self::with_id(Uuid::new_v4(), settings)
    }

    pub fn with_id(id: Uuid, settings: SessionSettings) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            settings,
            draft: String::new(),
            question: default_question().to_string(),
            question_is_random: false,
            last_feedback: None,
            journal: Journal::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Question the next submission answers
    pub fn active_question(&self) -> &str {
        &self.question
    }

    /// Whether the active question came from a random pick
    pub fn question_is_random(&self) -> bool {
        self.question_is_random
    }

    pub fn last_feedback(&self) -> Option<&str> {
        self.last_feedback.as_deref()
    }

    /// Character count shown under the text area
    pub fn draft_char_count(&self) -> usize {
        self.draft.chars().count()
    }

    /// Make `choice` the active question, drawing randomly when asked
    pub fn select_question(&mut self, choice: impl Into<QuestionChoice>) -> &str {
        self.select_question_with(choice, &mut rand::thread_rng())
    }

    /// `select_question` with a caller-supplied RNG
    pub fn select_question_with<R: Rng + ?Sized>(
        &mut self,
        choice: impl Into<QuestionChoice>,
        rng: &mut R,
    ) -> &str {
        let choice = choice.into();
        self.question = choice.resolve(rng);
        self.question_is_random = matches!(choice, QuestionChoice::Random);
        debug!(session = %self.id, random = self.question_is_random, "question selected");
        &self.question
    }

    /// Store the draft as typed; no validation here
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Check `text` against this session's threshold
    pub fn validate_draft(&self, text: &str) -> Result<(), ValidationError> {
        validate_draft(text, self.settings.min_chars())
    }

    /// Ask the feedback service about `draft` and journal the exchange on success
    ///
    /// On failure nothing is recorded, the draft and question stay as they were,
    /// and `last_feedback` is cleared so no stale answer is shown.
    pub async fn request_feedback<A>(
        &mut self,
        adapter: &A,
        question: &str,
        draft: &str,
        style: FeedbackStyle,
    ) -> Result<String, SessionError>
    where
        A: LlmAdapter + ?Sized,
    {
        let prompt = compose_feedback_prompt(question, draft, style);
        debug!(
            session = %self.id,
            provider = adapter.provider_name(),
            style = style.slug(),
            "requesting feedback"
        );

        match adapter.generate(&prompt).await {
            Ok(feedback) => {
                self.journal.append(JournalEntry::new(
                    Utc::now(),
                    question,
                    draft,
                    style,
                    feedback.clone(),
                ));
                self.last_feedback = Some(feedback.clone());
                info!(session = %self.id, entries = self.journal.len(), "feedback recorded");
                Ok(feedback)
            }
            Err(e) => {
                self.last_feedback = None;
                error!(session = %self.id, error = %e, "feedback service failed");
                Err(SessionError::FeedbackService(e.to_string()))
            }
        }
    }

    /// Validate the stored draft and request feedback for the active question
    pub async fn submit<A>(&mut self, adapter: &A, style: FeedbackStyle) -> Result<String, SessionError>
    where
        A: LlmAdapter + ?Sized,
    {
        if let Err(e) = self.validate_draft(&self.draft) {
            debug!(session = %self.id, reason = ?e, "draft rejected");
            return Err(e.into());
        }
        let question = self.question.clone();
        let draft = self.draft.clone();
        self.request_feedback(adapter, &question, &draft, style).await
    }

    /// Discard the draft and last feedback, plus the journal on a full reset
    pub fn clear_session(&mut self) {
        self.draft.clear();
        self.last_feedback = None;
        if self.settings.reset_scope == ResetScope::Full {
            self.journal.clear();
            self.question = default_question().to_string();
            self.question_is_random = false;
        }
        info!(session = %self.id, scope = ?self.settings.reset_scope, "session cleared");
    }

    /// Journal entries, most recent first
    pub fn list_journal(&self) -> Vec<JournalEntry> {
        self.journal.list()
    }

    /// Most recent journal entry
    pub fn latest_entry(&self) -> Option<&JournalEntry> {
        self.journal.latest()
    }

    pub fn journal_len(&self) -> usize {
        self.journal.len()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            created_at: self.created_at,
            question: self.question.clone(),
            question_is_random: self.question_is_random,
            draft: self.draft.clone(),
            draft_chars: self.draft_char_count(),
            last_feedback: self.last_feedback.clone(),
            journal: self.list_journal(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::stub::StubAdapter;
    use crate::llm::AdapterError;
    use crate::prompts::{RANDOM_QUESTION, REFLECTION_QUESTIONS};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const QUESTION: &str = "How are you feeling today emotionally?";
    const DRAFT: &str = "I feel okay today, a bit tired but hopeful.";

    fn session() -> ReflectionSession {
        ReflectionSession::new(SessionSettings::default())
    }

    #[test]
    fn test_new_session_defaults() {
        let s = session();
        assert_eq!(s.draft(), "");
        assert_eq!(s.active_question(), REFLECTION_QUESTIONS[0]);
        assert!(!s.question_is_random());
        assert!(s.list_journal().is_empty());
        assert!(s.last_feedback().is_none());
    }

    #[test]
    fn test_select_fixed_question() {
        let mut s = session();
        let q = s.select_question(REFLECTION_QUESTIONS[3]).to_string();
        assert_eq!(q, REFLECTION_QUESTIONS[3]);
        assert_eq!(s.active_question(), REFLECTION_QUESTIONS[3]);
        assert!(!s.question_is_random());
    }

    #[test]
    fn test_select_random_question_is_member_of_set() {
        let mut s = session();
        for seed in 0..100 {
            let mut rng = StdRng::seed_from_u64(seed);
            let q = s.select_question_with(RANDOM_QUESTION, &mut rng).to_string();
            assert!(REFLECTION_QUESTIONS.contains(&q.as_str()));
            assert_ne!(q, RANDOM_QUESTION);
            assert!(s.question_is_random());
        }
        s.select_question(QUESTION);
        assert!(!s.question_is_random());
    }

    #[test]
    fn test_set_draft_accepts_anything() {
        let mut s = session();
        s.set_draft("");
        assert_eq!(s.draft(), "");
        s.set_draft("hi");
        assert_eq!(s.draft(), "hi");
        assert_eq!(s.draft_char_count(), 2);
    }

    #[test]
    fn test_validate_uses_settings() {
        let strict = session();
        assert!(matches!(
            strict.validate_draft("too short"),
            Err(ValidationError::TooShort { .. })
        ));
        let simple = ReflectionSession::new(SessionSettings {
            min_reflection_chars: None,
            ..SessionSettings::default()
        });
        assert!(simple.validate_draft("too short").is_ok());
        assert_eq!(simple.validate_draft("   "), Err(ValidationError::EmptyInput));
    }

    #[tokio::test]
    async fn test_request_feedback_records_entry() {
        let mut s = session();
        let stub = StubAdapter::with_response("That's a valid feeling...");
        let before = Utc::now();

        let feedback = s
            .request_feedback(&stub, QUESTION, DRAFT, FeedbackStyle::Gentle)
            .await
            .unwrap();

        assert_eq!(feedback, "That's a valid feeling...");
        let journal = s.list_journal();
        assert_eq!(journal.len(), 1);
        let entry = &journal[0];
        assert_eq!(entry.question, QUESTION);
        assert_eq!(entry.reflection, DRAFT);
        assert_eq!(entry.feedback_style, FeedbackStyle::Gentle);
        assert_eq!(entry.feedback_style.label(), "Gentle & Encouraging");
        assert_eq!(entry.feedback, "That's a valid feeling...");
        assert!(entry.timestamp >= before);
        assert_eq!(s.last_feedback(), Some("That's a valid feeling..."));

        let prompts = stub.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains(QUESTION));
        assert!(prompts[0].contains(DRAFT));
        assert!(prompts[0].contains("Gentle & Encouraging"));
    }

    #[tokio::test]
    async fn test_request_feedback_failure_leaves_state() {
        let mut s = session();
        s.select_question(QUESTION);
        s.set_draft(DRAFT);
        let stub = StubAdapter::failing(AdapterError::Network("timed out".to_string()));

        let err = s
            .request_feedback(&stub, QUESTION, DRAFT, FeedbackStyle::Gentle)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            SessionError::FeedbackService("Network error: timed out".to_string())
        );
        assert!(err.to_string().contains("Network error: timed out"));
        assert!(s.list_journal().is_empty());
        assert_eq!(s.draft(), DRAFT);
        assert_eq!(s.active_question(), QUESTION);
    }

    #[tokio::test]
    async fn test_failure_after_success_clears_last_feedback() {
        let mut s = session();
        let ok = StubAdapter::with_response("That's a valid feeling...");
        s.request_feedback(&ok, QUESTION, DRAFT, FeedbackStyle::Gentle)
            .await
            .unwrap();
        assert_eq!(s.last_feedback(), Some("That's a valid feeling..."));

        let failing = StubAdapter::failing(AdapterError::Http {
            status: 500,
            message: "boom".to_string(),
        });
        assert!(s
            .request_feedback(&failing, QUESTION, DRAFT, FeedbackStyle::Gentle)
            .await
            .is_err());

        assert_eq!(s.last_feedback(), None);
        assert_eq!(s.snapshot().last_feedback, None);
        assert_eq!(s.journal_len(), 1);
    }

    #[tokio::test]
    async fn test_latest_entry_is_newest() {
        let mut s = session();
        assert!(s.latest_entry().is_none());
        let stub = StubAdapter::new();
        s.request_feedback(&stub, QUESTION, "first reflection with enough detail", FeedbackStyle::Gentle)
            .await
            .unwrap();
        s.request_feedback(&stub, QUESTION, "second reflection with enough detail", FeedbackStyle::Uplifting)
            .await
            .unwrap();

        let latest = s.latest_entry().unwrap();
        assert_eq!(latest.reflection, "second reflection with enough detail");
        assert_eq!(latest.feedback_style, FeedbackStyle::Uplifting);
    }

    #[tokio::test]
    async fn test_submit_validates_before_calling_service() {
        let mut s = session();
        let stub = StubAdapter::new();

        s.set_draft("   ");
        assert_eq!(
            s.submit(&stub, FeedbackStyle::Gentle).await,
            Err(SessionError::Validation(ValidationError::EmptyInput))
        );
        s.set_draft("short");
        assert!(matches!(
            s.submit(&stub, FeedbackStyle::Gentle).await,
            Err(SessionError::Validation(ValidationError::TooShort { length: 5, minimum: 20 }))
        ));
        assert!(stub.prompts().is_empty());
        assert_eq!(s.journal_len(), 0);

        s.set_draft(DRAFT);
        s.submit(&stub, FeedbackStyle::Practical).await.unwrap();
        assert_eq!(s.journal_len(), 1);
        assert_eq!(s.list_journal()[0].feedback_style, FeedbackStyle::Practical);
    }

    #[tokio::test]
    async fn test_journal_is_reverse_chronological() {
        let mut s = session();
        let stub = StubAdapter::new();
        for i in 0..3 {
            let draft = format!("reflection number {i} with enough detail");
            s.request_feedback(&stub, QUESTION, &draft, FeedbackStyle::Gentle)
                .await
                .unwrap();
        }
        let drafts: Vec<String> = s.list_journal().into_iter().map(|e| e.reflection).collect();
        assert_eq!(
            drafts,
            vec![
                "reflection number 2 with enough detail",
                "reflection number 1 with enough detail",
                "reflection number 0 with enough detail",
            ]
        );
    }

    #[tokio::test]
    async fn test_full_reset_clears_everything() {
        let mut s = session();
        let stub = StubAdapter::new();
        s.select_question(REFLECTION_QUESTIONS[5]);
        s.set_draft(DRAFT);
        s.submit(&stub, FeedbackStyle::Gentle).await.unwrap();

        s.clear_session();

        assert_eq!(s.draft(), "");
        assert!(s.last_feedback().is_none());
        assert!(s.list_journal().is_empty());
        assert_eq!(s.active_question(), REFLECTION_QUESTIONS[0]);
    }

    #[tokio::test]
    async fn test_draft_only_reset_keeps_journal() {
        let mut s = ReflectionSession::new(SessionSettings {
            reset_scope: ResetScope::DraftOnly,
            ..SessionSettings::default()
        });
        let stub = StubAdapter::new();
        s.select_question(REFLECTION_QUESTIONS[2]);
        s.set_draft(DRAFT);
        s.submit(&stub, FeedbackStyle::Gentle).await.unwrap();

        s.clear_session();

        assert_eq!(s.draft(), "");
        assert!(s.last_feedback().is_none());
        assert_eq!(s.list_journal().len(), 1);
        assert_eq!(s.active_question(), REFLECTION_QUESTIONS[2]);
    }

    #[test]
    fn test_snapshot() {
        let mut s = session();
        s.set_draft("héllo");
        let snap = s.snapshot();
        assert_eq!(snap.id, s.id());
        assert_eq!(snap.draft_chars, 5);
        assert!(snap.journal.is_empty());
    }
}
