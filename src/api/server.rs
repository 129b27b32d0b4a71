//! HTTP API server
//!
//! Routes:
//! - `POST /feedback` validates, classifies, stores and counts a submission
//! - `GET /summary` returns every row, ranked by importance
//!
//! Anything else answers 404.

use super::{error::ApiError, state::AppState};
use crate::error::Result;
use crate::ranking::{rank, theme_count_map};
use crate::storage::FeedbackOrder;
use crate::types::{FeedbackItem, Judgment, NewFeedback, Summary, DEFAULT_SOURCE};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info};

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    /// Server address
    pub addr: SocketAddr,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self {
            addr: ([127, 0, 0, 1], 8787).into(),
        }
    }
}

/// API server
pub struct ApiServer {
    config: ApiServerConfig,
    state: AppState,
}

impl ApiServer {
    /// Create new API server
    pub fn new(config: ApiServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Router with all routes and middleware
    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Bind the configured address and serve until the process exits
    pub async fn serve(self) -> Result<()> {
        let router = self.router();
        let listener = tokio::net::TcpListener::bind(self.config.addr).await?;

        info!(
            "API server listening on http://{} (classification {})",
            listener.local_addr()?,
            if self.state.classification_enabled() {
                "enabled"
            } else {
                "disabled"
            }
        );

        axum::serve(listener, router).await?;
        Ok(())
    }
}

/// Build router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/feedback",
            post(submit_feedback_handler).fallback(not_found_handler),
        )
        .route("/summary", get(summary_handler).fallback(not_found_handler))
        .fallback(not_found_handler)
        .with_state(state)
        // Middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// A validated submission body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// Trimmed, non-empty
    pub text: String,
    /// Trimmed; `"unknown"` when absent, blank or not a string
    pub source: String,
}

/// Parse and validate a submit-feedback body
pub fn parse_submission(body: &[u8]) -> std::result::Result<Submission, ApiError> {
    let value: Value = serde_json::from_slice(body).map_err(|_| ApiError::InvalidJson)?;

    let text = value
        .get("text")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(ApiError::MissingText)?;

    let source = value
        .get("source")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SOURCE);

    Ok(Submission {
        text: text.to_string(),
        source: source.to_string(),
    })
}

/// Submit feedback handler
async fn submit_feedback_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> std::result::Result<(StatusCode, Json<FeedbackItem>), ApiError> {
    let submission = parse_submission(&body)?;

    let judgment = match &state.classifier {
        Some(classifier) => classifier.classify(&submission.text).await.into_judgment(),
        None => Judgment::default(),
    };

    let item = state
        .storage
        .insert_feedback(&NewFeedback {
            text: submission.text,
            source: submission.source,
            judgment,
        })
        .await?;

    // Detached: the response does not wait for the tally
    if let Some(theme) = &item.theme {
        state.counter.record(theme.clone());
    }

    debug!("Accepted feedback id={} theme={:?}", item.id, item.theme);
    Ok((StatusCode::CREATED, Json(item)))
}

/// Summary handler
///
/// Ranked when classification is on; newest-first and unscored otherwise.
async fn summary_handler(
    State(state): State<AppState>,
) -> std::result::Result<Json<Summary>, ApiError> {
    let summary = if state.classification_enabled() {
        let (rows, snapshot) = tokio::try_join!(
            state.storage.list_feedback(FeedbackOrder::Inserted),
            state.counter.snapshot(),
        )?;

        let counts = theme_count_map(&snapshot);
        debug!("Ranking against {} themes", counts.len());
        Summary::Ranked(rank(rows, &counts))
    } else {
        Summary::Chronological(state.storage.list_feedback(FeedbackOrder::Recent).await?)
    };

    debug!("Serving summary of {} rows", summary.len());
    Ok(Json(summary))
}

async fn not_found_handler() -> ApiError {
    ApiError::NotFound
}
