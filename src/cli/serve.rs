//! HTTP server command

use feedback_triage::{
    error::Result, ApiServer, ApiServerConfig, AppConfig, AppState, Classifier, LibsqlStorage,
    LlmClassifier, StorageBackend, ThemeCounter,
};
use anyhow::Context;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Command-line values that take precedence over the loaded config
#[derive(Debug, Default)]
pub struct Overrides {
    pub addr: Option<String>,
    pub db_path: Option<PathBuf>,
    pub no_classify: bool,
}

impl Overrides {
    fn apply(self, config: &mut AppConfig) {
        if let Some(addr) = self.addr {
            config.server.addr = addr;
        }
        if let Some(path) = self.db_path {
            config.database.path = path;
        }
        if self.no_classify {
            config.classifier.enabled = false;
        }
    }
}

/// Handle serve command
pub async fn handle(config_path: Option<PathBuf>, overrides: Overrides) -> Result<()> {
    let mut config = AppConfig::load(config_path.as_deref())?;
    overrides.apply(&mut config);

    let addr = config.server_addr()?;
    debug!("Database path: {}", config.database.path.display());

    let storage: Arc<dyn StorageBackend> = Arc::new(
        LibsqlStorage::open(&config.database.path)
            .await
            .with_context(|| {
                format!("Failed to open database {}", config.database.path.display())
            })?,
    );
    let counter = ThemeCounter::spawn(storage.clone(), config.counter.queue_capacity);

    let classifier: Option<Arc<dyn Classifier>> = match config.llm_config() {
        Some(llm) => match LlmClassifier::new(llm) {
            Ok(classifier) => {
                info!("Classifying feedback with {}", classifier.model());
                Some(Arc::new(classifier))
            }
            Err(e) => {
                warn!("Failed to initialize classifier, continuing without it: {}", e);
                None
            }
        },
        None => None,
    };

    let state = AppState::new(storage, classifier, counter);
    ApiServer::new(ApiServerConfig { addr }, state).serve().await
}
