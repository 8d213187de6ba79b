//! API Server Module
//!
//! Router construction and the server loop.

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::handlers::{
    clear_session, create_session, delete_session, get_session, health_check, list_journal,
    list_questions, list_styles, pages, request_feedback, select_question, set_draft,
    validate_draft, ApiState,
};
use crate::models::ApiConfig;
use crate::store::SessionStore;

/// Build the application router over shared state
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Reflection page
        .route("/", get(pages::index))
        .route("/reflect", post(pages::submit_reflection))
        .route("/reflect/question", post(pages::change_question))
        .route("/reset", post(pages::reset))
        // Reference data
        .route("/api/questions", get(list_questions))
        .route("/api/styles", get(list_styles))
        // Session operations
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/:id", get(get_session).delete(delete_session))
        .route("/api/sessions/:id/question", post(select_question))
        .route("/api/sessions/:id/draft", axum::routing::put(set_draft))
        .route("/api/sessions/:id/validate", post(validate_draft))
        .route("/api/sessions/:id/feedback", post(request_feedback))
        .route("/api/sessions/:id/clear", post(clear_session))
        .route("/api/sessions/:id/journal", get(list_journal))
        // Health check
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Main API server
pub struct ApiServer {
    /// Server configuration
    config: ApiConfig,
    /// Shared state
    state: Arc<ApiState>,
}

impl ApiServer {
    /// Create a new API server
    pub fn new(config: ApiConfig, state: ApiState) -> Self {
        Self {
            config,
            state: Arc::new(state),
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn state(&self) -> Arc<ApiState> {
        self.state.clone()
    }

    /// Resolved listen address
    pub fn addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        addr.parse()
            .map_err(|e| anyhow::anyhow!("Invalid listen address {}: {}", addr, e))
    }

    /// Start the API server and run until Ctrl-C
    pub async fn start(&self) -> Result<()> {
        let addr = self.addr()?;
        info!(
            "Starting reflection server v{} on {}",
            self.config.version, addr
        );

        let sweeper = spawn_session_sweeper(self.state.sessions.clone());
        let app = router(self.state.clone());
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind {}: {}", addr, e))?;
        info!("Reflection server listening on http://{}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to start API server: {}", e))?;

        sweeper.abort();
        info!("Reflection server stopped");
        Ok(())
    }
}

/// Periodically drop idle sessions
fn spawn_session_sweeper(sessions: SessionStore) -> tokio::task::JoinHandle<()> {
    let period = (sessions.idle_timeout() / 2).max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            sessions.evict_idle();
        }
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
