//! Feedback Triage - command-line entry point
//!
//! `serve` runs the HTTP API; `seed` loads sample feedback into a running
//! server.

mod cli;

use clap::{Parser, Subcommand};
use feedback_triage::{error::Result, seed::DEFAULT_SEED_URL};
use std::path::PathBuf;
use tracing::{debug, Level};
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(name = "feedback-triage")]
#[command(about = "Feedback ingestion with LLM classification and importance ranking", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Set log level
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Configuration file (defaults to ./feedback-triage.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Listen address (overrides server.addr)
        #[arg(long)]
        addr: Option<String>,

        /// Database path (overrides database.path)
        #[arg(long)]
        db_path: Option<PathBuf>,

        /// Store feedback unclassified and serve it newest-first
        #[arg(long)]
        no_classify: bool,
    },

    /// Post the sample feedback set to a running server
    Seed {
        /// Server base URL
        #[arg(long, env = "WORKER_URL", default_value = DEFAULT_SEED_URL)]
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Request spans follow the chosen level; the database driver stays quiet
    let level_str = level.as_str().to_lowercase();
    let filter = EnvFilter::new(format!(
        "feedback_triage={0},tower_http={0},libsql=warn",
        level_str
    ));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr) // Write logs to stderr, not stdout
        .init();

    debug!("Feedback Triage v{} starting...", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Serve {
            addr,
            db_path,
            no_classify,
        } => {
            cli::serve::handle(
                cli.config,
                cli::serve::Overrides {
                    addr,
                    db_path,
                    no_classify,
                },
            )
            .await
        }
        Commands::Seed { url } => cli::seed::handle(url).await,
    }
}
