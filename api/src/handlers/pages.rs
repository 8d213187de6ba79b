//! HTML form handlers
//!
//! One handler per user action on the reflection page. The session is found
//! through the `reflect_session` cookie and created on the first form post.

use axum::{
    debug_handler,
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use reflect_core::{FeedbackStyle, QuestionChoice, ReflectionSession, SessionError, SessionSnapshot};

use super::{parse_choice, parse_style, ApiError, ApiState};
use crate::models::ReflectForm;
use crate::render::Notice;

/// Cookie carrying the session id
pub const SESSION_COOKIE: &str = "reflect_session";

/// Extract the session id from the `Cookie` header
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

fn session_cookie(id: Uuid) -> Option<HeaderValue> {
    HeaderValue::from_str(&format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, id
    ))
    .ok()
}

/// Attach `Set-Cookie` when the session was just created
fn with_cookie(mut response: Response, id: Uuid, created: bool) -> Response {
    if created {
        if let Some(cookie) = session_cookie(id) {
            response.headers_mut().insert(header::SET_COOKIE, cookie);
        }
    }
    response
}

/// Apply the selector value from the form
///
/// Re-posting "Random Question" while a random question is active keeps it,
/// so the user answers the question that was shown.
fn apply_selector(session: &mut ReflectionSession, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    match parse_choice(value)? {
        QuestionChoice::Random if session.question_is_random() => {}
        QuestionChoice::Fixed(ref q) if q == session.active_question() && !session.question_is_random() => {}
        choice => {
            session.select_question(choice);
        }
    }
    Ok(())
}

/// Re-render the page with a warning for a malformed form value
fn reject_form(
    state: &ApiState,
    snapshot: &SessionSnapshot,
    error: &ApiError,
) -> Result<Response, ApiError> {
    debug!(reason = %error, "form rejected");
    let notice = Notice::warning(error.to_string());
    let html = state
        .renderer
        .render(snapshot, FeedbackStyle::default(), Some(notice))?;
    Ok((StatusCode::BAD_REQUEST, Html(html)).into_response())
}

/// Render the reflection page
///
/// Visitors without a live session get a blank page; a session is only
/// stored once they act on the form.
#[debug_handler]
pub async fn index(State(state): State<Arc<ApiState>>, headers: HeaderMap) -> Result<Response, ApiError> {
    let snapshot = match session_id_from_headers(&headers).and_then(|id| state.sessions.get(&id)) {
        Some(session) => {
            let snapshot = session.lock().await.snapshot();
            snapshot
        }
        None => ReflectionSession::new(state.settings.clone()).snapshot(),
    };
    let html = state.renderer.render(&snapshot, FeedbackStyle::default(), None)?;
    Ok(Html(html).into_response())
}

/// Change the question, keeping whatever was typed
#[debug_handler]
pub async fn change_question(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    Form(form): Form<ReflectForm>,
) -> Result<Response, ApiError> {
    let (id, session, created) = state
        .sessions
        .get_or_create(session_id_from_headers(&headers), &state.settings);
    let mut session = session.lock().await;
    session.set_draft(form.draft);

    let parsed = parse_style(Some(&form.style))
        .and_then(|style| parse_choice(&form.question).map(|choice| (style, choice)));
    let (style, choice) = match parsed {
        Ok(parsed) => parsed,
        Err(e) => {
            let response = reject_form(&state, &session.snapshot(), &e)?;
            return Ok(with_cookie(response, id, created));
        }
    };

    // Random draws again every time the button is pressed
    session.select_question(choice);

    let html = state.renderer.render(&session.snapshot(), style, None)?;
    Ok(with_cookie(Html(html).into_response(), id, created))
}

/// "Get Feedback": validate, call the feedback service, render the outcome
#[debug_handler]
pub async fn submit_reflection(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    Form(form): Form<ReflectForm>,
) -> Result<Response, ApiError> {
    let (id, session, created) = state
        .sessions
        .get_or_create(session_id_from_headers(&headers), &state.settings);
    let mut session = session.lock().await;

    let parsed = parse_style(Some(&form.style))
        .and_then(|style| apply_selector(&mut session, &form.question).map(|()| style));
    session.set_draft(form.draft);
    let style = match parsed {
        Ok(style) => style,
        Err(e) => {
            let response = reject_form(&state, &session.snapshot(), &e)?;
            return Ok(with_cookie(response, id, created));
        }
    };

    debug!(session = %id, style = style.slug(), "reflection submitted");
    let (status, notice) = match session.submit(state.adapter.as_ref(), style).await {
        Ok(feedback) => (StatusCode::OK, Notice::success(feedback)),
        Err(e) => {
            let status = match e {
                SessionError::Validation(ref v) => {
                    warn!(session = %id, reason = ?v, "draft rejected");
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                SessionError::FeedbackService(_) => StatusCode::BAD_GATEWAY,
            };
            (status, Notice::from_error(&e))
        }
    };

    let html = state.renderer.render(&session.snapshot(), style, Some(notice))?;
    Ok(with_cookie((status, Html(html)).into_response(), id, created))
}

/// "Clear Reflection": reset the session and go back to the form
#[debug_handler]
pub async fn reset(State(state): State<Arc<ApiState>>, headers: HeaderMap) -> Response {
    if let Some(session) = session_id_from_headers(&headers).and_then(|id| state.sessions.get(&id)) {
        session.lock().await.clear_session();
    }
    Redirect::to("/").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reflect_core::{SessionSettings, REFLECTION_QUESTIONS};

    #[test]
    fn test_session_id_from_headers() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("theme=dark; {}={}", SESSION_COOKIE, id)).unwrap(),
        );
        assert_eq!(session_id_from_headers(&headers), Some(id));
    }

    #[test]
    fn test_session_id_from_headers_invalid() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_id_from_headers(&headers), None);
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("reflect_session=not-a-uuid"),
        );
        assert_eq!(session_id_from_headers(&headers), None);
    }

    #[test]
    fn test_apply_selector_keeps_active_random_question() {
        let mut session = ReflectionSession::new(SessionSettings::default());
        apply_selector(&mut session, "Random Question").unwrap();
        assert!(session.question_is_random());
        let drawn = session.active_question().to_string();

        for _ in 0..20 {
            apply_selector(&mut session, "Random Question").unwrap();
            assert_eq!(session.active_question(), drawn);
        }

        apply_selector(&mut session, REFLECTION_QUESTIONS[4]).unwrap();
        assert!(!session.question_is_random());
        assert_eq!(session.active_question(), REFLECTION_QUESTIONS[4]);
    }

    #[test]
    fn test_apply_selector_rejects_unknown_question() {
        let mut session = ReflectionSession::new(SessionSettings::default());
        assert!(apply_selector(&mut session, "Why?").is_err());
        assert!(apply_selector(&mut session, "").is_ok());
        assert_eq!(session.active_question(), REFLECTION_QUESTIONS[0]);
    }
}
