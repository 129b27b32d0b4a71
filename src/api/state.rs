//! Shared request state

use crate::counter::ThemeCounter;
use crate::services::Classifier;
use crate::storage::StorageBackend;
use std::sync::Arc;

/// State shared by all request handlers
///
/// Holds no mutable data of its own: rows live in storage and tallies behind
/// the counter task.
#[derive(Clone)]
pub struct AppState {
    /// Feedback store
    pub storage: Arc<dyn StorageBackend>,
    /// Classifier, `None` when classification is turned off
    pub classifier: Option<Arc<dyn Classifier>>,
    /// Theme counter handle
    pub counter: ThemeCounter,
}

impl AppState {
    pub fn new(
        storage: Arc<dyn StorageBackend>,
        classifier: Option<Arc<dyn Classifier>>,
        counter: ThemeCounter,
    ) -> Self {
        Self {
            storage,
            classifier,
            counter,
        }
    }

    /// Whether submissions are classified and summaries ranked
    pub fn classification_enabled(&self) -> bool {
        self.classifier.is_some()
    }
}
