//! HTTP API for feedback submission and the ranked summary
//!
//! Provides:
//! - `POST /feedback` submission endpoint
//! - `GET /summary` importance-ranked view
//! - JSON error bodies for everything else

pub mod error;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use server::{build_router, parse_submission, ApiServer, ApiServerConfig, Submission};
pub use state::AppState;
