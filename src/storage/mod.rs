//! Storage layer for the feedback triage service
//!
//! Persists feedback rows and the per-theme tallies behind the theme counter.

pub mod libsql;

use crate::error::Result;
use crate::types::{FeedbackItem, NewFeedback, ThemeCount};
use async_trait::async_trait;

pub use self::libsql::LibsqlStorage;

/// Storage backend trait defining all required operations
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Insert a feedback row, returning it with its generated id and timestamp
    async fn insert_feedback(&self, feedback: &NewFeedback) -> Result<FeedbackItem>;

    /// Read every feedback row
    async fn list_feedback(&self, order: FeedbackOrder) -> Result<Vec<FeedbackItem>>;

    /// Add one to a theme's tally, creating it at 1 on first sight
    ///
    /// Must be a single atomic upsert so concurrent increments are not lost.
    async fn increment_theme(&self, theme: &str) -> Result<()>;

    /// All theme tallies, highest count first
    async fn theme_counts(&self) -> Result<Vec<ThemeCount>>;
}

/// Row order for [`StorageBackend::list_feedback`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackOrder {
    /// Table order (ascending id)
    Inserted,
    /// Newest first
    Recent,
}
