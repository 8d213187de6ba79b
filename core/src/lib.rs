//! Reflect Core Module
//!
//! Session state and journal for the reflection service, the fixed prompt
//! set, draft validation, configuration, and the adapters that talk to the
//! external feedback service.

pub mod config;
pub mod journal;
pub mod llm;
pub mod prompts;
pub mod session;
pub mod validation;

pub use config::{AppConfig, ConfigError, ConfigFormat, ConfigManager, FeedbackConfig, FeedbackProvider};
pub use journal::{Journal, JournalEntry};
pub use llm::{create_adapter, Adapter, AdapterError, LlmAdapter};
pub use prompts::{FeedbackStyle, QuestionChoice, RANDOM_QUESTION, REFLECTION_QUESTIONS};
pub use session::{ReflectionSession, ResetScope, SessionError, SessionSettings, SessionSnapshot};
pub use validation::{validate_draft, ValidationError};
