//! Theme counter
//!
//! A single background task owns all writes to the theme tallies and drains a
//! bounded command queue, so increments are applied one at a time in arrival
//! order. Callers record themes without waiting: there is no reply channel for
//! increments, and a failed or dropped increment is only logged.
//!
//! Snapshots travel through the same queue, so a snapshot observes every
//! increment recorded before it was requested. Increments still queued when
//! the process exits are lost.

use crate::error::{Result, TriageError};
use crate::storage::StorageBackend;
use crate::types::ThemeCount;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

/// Default queue capacity
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

enum CounterCommand {
    Record(String),
    Snapshot(oneshot::Sender<Result<Vec<ThemeCount>>>),
}

/// Handle to the theme counter task
///
/// Cheap to clone; the task stops once every handle is dropped and the queue
/// has drained.
#[derive(Clone)]
pub struct ThemeCounter {
    tx: mpsc::Sender<CounterCommand>,
}

impl ThemeCounter {
    /// Spawn the counter task on the current Tokio runtime
    pub fn spawn(storage: Arc<dyn StorageBackend>, capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));

        tokio::spawn(run_counter(storage, rx));

        Self { tx }
    }

    /// Queue one increment for `theme` and return immediately
    pub fn record(&self, theme: impl Into<String>) {
        let theme = theme.into();
        if let Err(e) = self.tx.try_send(CounterCommand::Record(theme.clone())) {
            let reason = match e {
                mpsc::error::TrySendError::Full(_) => "queue full",
                mpsc::error::TrySendError::Closed(_) => "counter stopped",
            };
            warn!("Dropping increment for theme '{}': {}", theme, reason);
        }
    }

    /// All tallies, highest count first
    pub async fn snapshot(&self) -> Result<Vec<ThemeCount>> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.tx
            .send(CounterCommand::Snapshot(reply_tx))
            .await
            .map_err(|_| TriageError::CounterUnavailable("counter task stopped".to_string()))?;

        reply_rx.await.map_err(|_| {
            TriageError::CounterUnavailable("counter task dropped the snapshot request".to_string())
        })?
    }
}

async fn run_counter(storage: Arc<dyn StorageBackend>, mut rx: mpsc::Receiver<CounterCommand>) {
    info!("Theme counter started");

    while let Some(command) = rx.recv().await {
        match command {
            CounterCommand::Record(theme) => {
                if let Err(e) = storage.increment_theme(&theme).await {
                    error!("Failed to increment theme '{}': {}", theme, e);
                } else {
                    debug!("Incremented theme '{}'", theme);
                }
            }
            CounterCommand::Snapshot(reply) => {
                // Receiver may have given up; nothing to do then
                let _ = reply.send(storage.theme_counts().await);
            }
        }
    }

    info!("Theme counter stopped");
}
