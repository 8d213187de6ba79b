//! API Handlers Module
//!
//! JSON handlers for the reflection session API. HTML form handlers live in
//! `pages`.

pub mod pages;

use axum::{
    debug_handler,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, warn};
use uuid::Uuid;

use reflect_core::prompts::RANDOM_QUESTION;
use reflect_core::{
    Adapter, FeedbackStyle, JournalEntry, LlmAdapter, QuestionChoice, SessionError,
    SessionSettings, SessionSnapshot, REFLECTION_QUESTIONS,
};

use crate::models::{
    CreateSessionResponse, DraftRequest, DraftResponse, ErrorResponse, FeedbackRequest,
    FeedbackResponse, QuestionRequest, QuestionResponse, QuestionsResponse, StyleInfo,
    ValidateRequest, ValidateResponse,
};
use crate::render::PageRenderer;
use crate::store::{SessionStore, SharedSession};

/// Represents the state of the API server
#[derive(Debug)]
pub struct ApiState {
    /// Live sessions
    pub sessions: SessionStore,
    /// Feedback service
    pub adapter: Arc<Adapter>,
    /// Settings applied to every new session
    pub settings: SessionSettings,
    pub renderer: PageRenderer,
}

impl ApiState {
    pub fn new(adapter: Adapter, settings: SessionSettings) -> Result<Self, minijinja::Error> {
        Self::with_store(adapter, settings, SessionStore::new())
    }

    /// State over a store with custom idle and capacity limits
    pub fn with_store(
        adapter: Adapter,
        settings: SessionSettings,
        sessions: SessionStore,
    ) -> Result<Self, minijinja::Error> {
        Ok(Self {
            sessions,
            adapter: Arc::new(adapter),
            settings,
            renderer: PageRenderer::new()?,
        })
    }

    fn session(&self, id: Uuid) -> Result<SharedSession, ApiError> {
        self.sessions.get(&id).ok_or(ApiError::SessionNotFound(id))
    }
}

/// Handler errors, rendered as `ErrorResponse` JSON
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Failed to render page: {0}")]
    Render(String),
}

impl ApiError {
    fn kind(&self) -> &'static str {
        match self {
            ApiError::SessionNotFound(_) => "session_not_found",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Session(SessionError::Validation(_)) => "validation",
            ApiError::Session(SessionError::FeedbackService(_)) => "feedback_service",
            ApiError::Render(_) => "render",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Session(SessionError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Session(SessionError::FeedbackService(_)) => StatusCode::BAD_GATEWAY,
            ApiError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<minijinja::Error> for ApiError {
    fn from(err: minijinja::Error) -> Self {
        ApiError::Render(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(kind = self.kind(), "{}", self);
        }
        let body = ErrorResponse {
            kind: self.kind().to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Parse an optional style value, defaulting to the gentle tone
pub(crate) fn parse_style(value: Option<&str>) -> Result<FeedbackStyle, ApiError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => v
            .parse()
            .map_err(|e: reflect_core::prompts::UnknownStyle| ApiError::BadRequest(e.to_string())),
        None => Ok(FeedbackStyle::default()),
    }
}

/// Reject literal questions outside the fixed set
pub(crate) fn parse_choice(value: &str) -> Result<QuestionChoice, ApiError> {
    let choice = QuestionChoice::parse(value);
    match &choice {
        QuestionChoice::Fixed(q) if !REFLECTION_QUESTIONS.contains(&q.as_str()) => Err(
            ApiError::BadRequest(format!("Unknown reflection question: {}", q)),
        ),
        _ => Ok(choice),
    }
}

/// Health check endpoint
#[debug_handler]
pub async fn health_check(State(state): State<Arc<ApiState>>) -> Json<HashMap<String, String>> {
    let mut response = HashMap::new();
    response.insert("status".to_string(), "healthy".to_string());
    response.insert("service".to_string(), "reflect-api".to_string());
    response.insert(
        "feedback_provider".to_string(),
        state.adapter.provider_name().to_string(),
    );
    response.insert("sessions".to_string(), state.sessions.len().to_string());
    Json(response)
}

/// List the fixed question set
#[debug_handler]
pub async fn list_questions() -> Json<QuestionsResponse> {
    Json(QuestionsResponse {
        questions: REFLECTION_QUESTIONS.iter().map(|q| q.to_string()).collect(),
        random_choice: RANDOM_QUESTION.to_string(),
    })
}

/// List feedback tones
#[debug_handler]
pub async fn list_styles() -> Json<Vec<StyleInfo>> {
    Json(
        FeedbackStyle::ALL
            .iter()
            .map(|s| StyleInfo {
                slug: s.slug().to_string(),
                label: s.label().to_string(),
            })
            .collect(),
    )
}

/// Start a session
#[debug_handler]
pub async fn create_session(
    State(state): State<Arc<ApiState>>,
) -> (StatusCode, Json<CreateSessionResponse>) {
    let (id, session) = state.sessions.create(state.settings.clone());
    let question = session.lock().await.active_question().to_string();
    (StatusCode::CREATED, Json(CreateSessionResponse { id, question }))
}

/// Snapshot of a session
#[debug_handler]
pub async fn get_session(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let session = state.session(id)?;
    let snapshot = session.lock().await.snapshot();
    Ok(Json(snapshot))
}

/// End a session
#[debug_handler]
pub async fn delete_session(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.sessions.remove(&id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::SessionNotFound(id))
    }
}

/// Choose the active question
#[debug_handler]
pub async fn select_question(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<QuestionRequest>,
) -> Result<Json<QuestionResponse>, ApiError> {
    let choice = parse_choice(&request.choice)?;
    let session = state.session(id)?;
    let mut session = session.lock().await;
    let question = session.select_question(choice).to_string();
    Ok(Json(QuestionResponse {
        question,
        random: session.question_is_random(),
    }))
}

/// Store the draft
#[debug_handler]
pub async fn set_draft(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<DraftRequest>,
) -> Result<Json<DraftResponse>, ApiError> {
    let session = state.session(id)?;
    let mut session = session.lock().await;
    session.set_draft(request.text);
    Ok(Json(DraftResponse {
        draft_chars: session.draft_char_count(),
    }))
}

/// Check a draft without submitting it
#[debug_handler]
pub async fn validate_draft(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    request: Option<Json<ValidateRequest>>,
) -> Result<Json<ValidateResponse>, ApiError> {
    let request = request.map(|Json(r)| r).unwrap_or_default();
    let session = state.session(id)?;
    let session = session.lock().await;
    let text = request.text.as_deref().unwrap_or_else(|| session.draft());
    let response = match session.validate_draft(text) {
        Ok(()) => ValidateResponse {
            valid: true,
            error: None,
            message: None,
        },
        Err(e) => ValidateResponse {
            valid: false,
            message: Some(e.to_string()),
            error: Some(e),
        },
    };
    Ok(Json(response))
}

/// Submit the draft for feedback
#[debug_handler]
pub async fn request_feedback(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<FeedbackRequest>,
) -> Result<Json<FeedbackResponse>, ApiError> {
    let style = parse_style(request.style.as_deref())?;
    let choice = request.question.as_deref().map(parse_choice).transpose()?;
    let session = state.session(id)?;
    let mut session = session.lock().await;

    if let Some(choice) = choice {
        session.select_question(choice);
    }
    if let Some(draft) = request.draft {
        session.set_draft(draft);
    }

    debug!(session = %id, style = style.slug(), "feedback requested");
    let feedback = session
        .submit(state.adapter.as_ref(), style)
        .await
        .map_err(|e| {
            if let SessionError::Validation(ref v) = e {
                warn!(session = %id, reason = ?v, "draft rejected");
            }
            ApiError::Session(e)
        })?;

    let entry: JournalEntry = session
        .latest_entry()
        .cloned()
        .ok_or_else(|| ApiError::Render("journal entry missing after feedback".to_string()))?;

    Ok(Json(FeedbackResponse {
        feedback,
        entry,
        journal_len: session.journal_len(),
    }))
}

/// Reset the session
#[debug_handler]
pub async fn clear_session(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let session = state.session(id)?;
    let mut session = session.lock().await;
    session.clear_session();
    Ok(Json(session.snapshot()))
}

/// Journal entries, most recent first
#[debug_handler]
pub async fn list_journal(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<JournalEntry>>, ApiError> {
    let session = state.session(id)?;
    let journal = session.lock().await.list_journal();
    Ok(Json(journal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reflect_core::ValidationError;

    #[test]
    fn test_parse_style() {
        assert_eq!(parse_style(None).unwrap(), FeedbackStyle::Gentle);
        assert_eq!(parse_style(Some("")).unwrap(), FeedbackStyle::Gentle);
        assert_eq!(parse_style(Some("practical")).unwrap(), FeedbackStyle::Practical);
        assert!(matches!(parse_style(Some("harsh")), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_parse_choice() {
        assert_eq!(parse_choice("random").unwrap(), QuestionChoice::Random);
        assert!(matches!(
            parse_choice(REFLECTION_QUESTIONS[1]),
            Ok(QuestionChoice::Fixed(_))
        ));
        assert!(matches!(
            parse_choice("What is the meaning of life?"),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            ApiError::Session(SessionError::Validation(ValidationError::EmptyInput)).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::Session(SessionError::FeedbackService("x".to_string())).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::SessionNotFound(Uuid::nil()).status(),
            StatusCode::NOT_FOUND
        );
    }
}
