//! Error types for the feedback triage service
//!
//! Structured error definitions use thiserror. The binary attaches context
//! with anyhow, which converts into [`TriageError::Other`].

use thiserror::Error;

/// Main error type for feedback triage operations
#[derive(Error, Debug)]
pub enum TriageError {
    /// Database operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// Schema bootstrap failed
    #[error("Migration error: {0}")]
    Migration(String),

    /// Classifier request or response handling failed
    #[error("Classifier error: {0}")]
    Classifier(String),

    /// Theme counter task is gone or refused the command
    #[error("Theme counter unavailable: {0}")]
    CounterUnavailable(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Result type alias for feedback triage operations
pub type Result<T> = std::result::Result<T, TriageError>;

impl From<libsql::Error> for TriageError {
    fn from(err: libsql::Error) -> Self {
        TriageError::Database(err.to_string())
    }
}

/// Convert anyhow::Error to TriageError
impl From<anyhow::Error> for TriageError {
    fn from(err: anyhow::Error) -> Self {
        // Alternate form keeps the whole context chain
        TriageError::Other(format!("{:#}", err))
    }
}
