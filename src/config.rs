//! Service configuration
//!
//! Sources, later ones winning:
//! 1. Built-in defaults
//! 2. Optional TOML file (`feedback-triage.toml` unless a path is given)
//! 3. Environment variables such as `FEEDBACK_TRIAGE__SERVER__ADDR`
//!
//! The Anthropic API key is read from `classifier.api_key` or, failing that,
//! from `ANTHROPIC_API_KEY`. Command-line flags are applied by the binary on
//! top of the loaded values.

use crate::counter::DEFAULT_QUEUE_CAPACITY;
use crate::error::{Result, TriageError};
use crate::services::LlmConfig;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// File read when no explicit config path is given
pub const DEFAULT_CONFIG_FILE: &str = "feedback-triage.toml";

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "FEEDBACK_TRIAGE";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub classifier: ClassifierConfig,
    pub counter: CounterConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Listen address, `host:port`
    pub addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Local libSQL database file
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierConfig {
    /// Classify submissions and rank the summary
    pub enabled: bool,
    pub model: String,
    pub max_tokens: usize,
    pub temperature: f32,
    pub api_base: String,
    pub timeout_secs: u64,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CounterConfig {
    /// Pending increments held before new ones are dropped
    pub queue_capacity: usize,
}

/// Default database path under the platform data directory
pub fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("feedback-triage")
        .join("feedback.db")
}

impl AppConfig {
    /// Load configuration
    ///
    /// An explicitly given file must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let llm = LlmConfig::default();

        let file = match path {
            Some(p) => File::from(p).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings = Config::builder()
            .set_default("server.addr", "127.0.0.1:8787")?
            .set_default(
                "database.path",
                default_db_path().to_string_lossy().to_string(),
            )?
            .set_default("classifier.enabled", true)?
            .set_default("classifier.model", llm.model)?
            .set_default("classifier.max_tokens", llm.max_tokens as i64)?
            .set_default("classifier.temperature", llm.temperature as f64)?
            .set_default("classifier.api_base", llm.api_base)?
            .set_default("classifier.timeout_secs", llm.timeout.as_secs() as i64)?
            .set_default("counter.queue_capacity", DEFAULT_QUEUE_CAPACITY as i64)?
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: AppConfig = settings.try_deserialize()?;

        let key_missing = config
            .classifier
            .api_key
            .as_deref()
            .map_or(true, str::is_empty);
        if key_missing {
            config.classifier.api_key = std::env::var("ANTHROPIC_API_KEY")
                .ok()
                .filter(|k| !k.is_empty());
        }

        debug!(
            "Loaded configuration (addr: {}, db: {})",
            config.server.addr,
            config.database.path.display()
        );
        Ok(config)
    }

    pub fn server_addr(&self) -> Result<SocketAddr> {
        self.server.addr.parse().map_err(|e| {
            TriageError::Config(config::ConfigError::Message(format!(
                "Invalid server.addr '{}': {}",
                self.server.addr, e
            )))
        })
    }

    /// Classifier settings, or `None` when classification is off
    ///
    /// An enabled classifier without an API key is switched off with a
    /// warning rather than failing startup.
    pub fn llm_config(&self) -> Option<LlmConfig> {
        if !self.classifier.enabled {
            return None;
        }

        let Some(api_key) = self.classifier.api_key.clone() else {
            warn!("Classification enabled but no API key configured; running without it");
            return None;
        };

        Some(LlmConfig {
            api_key,
            model: self.classifier.model.clone(),
            max_tokens: self.classifier.max_tokens,
            temperature: self.classifier.temperature,
            api_base: self.classifier.api_base.clone(),
            timeout: Duration::from_secs(self.classifier.timeout_secs),
        })
    }
}
