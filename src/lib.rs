//! Feedback Triage - feedback ingestion with LLM classification and ranking
//!
//! A small HTTP service that:
//! - Accepts short free-text feedback items
//! - Classifies each with an LLM (theme, sentiment, urgency, summary)
//! - Keeps a running per-theme frequency count
//! - Serves a summary ranked by an additive importance score
//!
//! # Architecture
//!
//! - **Types**: Feedback rows, judgments, theme tallies
//! - **Storage**: libSQL-backed feedback table and theme tallies
//! - **Services**: LLM classifier with degrade-to-null behaviour
//! - **Counter**: Serialized background task owning theme increments
//! - **Ranking**: Pure importance scoring and stable ordering
//! - **API**: axum router for `POST /feedback` and `GET /summary`
//!
//! # Example
//!
//! ```ignore
//! use feedback_triage::{AppState, ApiServer, ApiServerConfig, LibsqlStorage, ThemeCounter};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> feedback_triage::Result<()> {
//!     let storage = Arc::new(LibsqlStorage::open("feedback.db").await?);
//!     let counter = ThemeCounter::spawn(storage.clone(), 1024);
//!     let state = AppState::new(storage, None, counter);
//!
//!     ApiServer::new(ApiServerConfig::default(), state).serve().await
//! }
//! ```

pub mod api;
pub mod config;
pub mod counter;
pub mod error;
pub mod ranking;
pub mod seed;
pub mod services;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use api::{build_router, ApiServer, ApiServerConfig, AppState};
pub use config::AppConfig;
pub use counter::ThemeCounter;
pub use error::{Result, TriageError};
pub use ranking::rank;
pub use services::{Classification, Classifier, LlmClassifier, LlmConfig};
pub use storage::{FeedbackOrder, LibsqlStorage, StorageBackend};
pub use types::{
    FeedbackItem, Judgment, NewFeedback, RankedFeedback, Sentiment, Summary, ThemeCount, Urgency,
};
