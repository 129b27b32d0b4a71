//! Sample data loader
//!
//! Posts a fixed set of realistic feedback items to a running server through
//! its public `POST /feedback` endpoint. Failures are reported per item and do
//! not stop the run.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Server targeted when nothing else is configured
pub const DEFAULT_SEED_URL: &str = "http://localhost:8787";

/// One sample submission
#[derive(Debug, Clone, Serialize)]
pub struct SeedItem {
    pub text: &'static str,
    pub source: &'static str,
}

const fn item(text: &'static str, source: &'static str) -> SeedItem {
    SeedItem { text, source }
}

/// The sample set
pub const SEED_ITEMS: &[SeedItem] = &[
    item("Dashboard takes 10+ seconds to load after the last update", "slack"),
    item("Love the new dark mode, works great on mobile", "survey"),
    item("Export to CSV has been broken for two weeks, this is blocking our monthly reporting", "support"),
    item("Would be nice to have keyboard shortcuts for common actions", "email"),
    item("App crashes when uploading files over 5MB", "support"),
    item("The onboarding flow is confusing, took me 20 minutes to figure out how to invite teammates", "survey"),
    item("Search is blazing fast now, great improvement!", "slack"),
    item("Getting 500 errors intermittently on the billing page", "support"),
    item("Please add SSO support, our security team requires it for compliance", "email"),
    item("Charts on the analytics page render incorrectly in Firefox", "support"),
    item("The API rate limiting is too aggressive, we hit limits during normal usage", "slack"),
    item("Notifications are unreliable, sometimes I get them hours late", "email"),
    item("Really impressed with the new collaboration features, our team productivity is up", "survey"),
    item("Mobile app drains battery very quickly in the background", "support"),
    item("Would love a Slack integration for real-time alerts", "email"),
];

/// Result of posting one item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    /// Stored with this id
    Created { id: i64 },
    /// Server answered with an error status
    Rejected { status: u16, error: String },
    /// Request never completed
    Failed { error: String },
}

/// Per-item outcomes of a seeding run
#[derive(Debug, Clone, Default)]
pub struct SeedReport {
    pub outcomes: Vec<(SeedItem, SeedOutcome)>,
}

impl SeedReport {
    pub fn created(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, SeedOutcome::Created { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.created()
    }
}

#[derive(Debug, Deserialize)]
struct CreatedBody {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Client that submits seed items to a server
pub struct Seeder {
    base_url: String,
    client: reqwest::Client,
}

impl Seeder {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/feedback", self.base_url)
    }

    /// Submit one item
    pub async fn submit(&self, item: &SeedItem) -> SeedOutcome {
        let response = match self.client.post(self.endpoint()).json(item).send().await {
            Ok(response) => response,
            Err(e) => {
                return SeedOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };

        let status = response.status();
        if status.is_success() {
            match response.json::<CreatedBody>().await {
                Ok(body) => SeedOutcome::Created { id: body.id },
                Err(e) => SeedOutcome::Failed {
                    error: format!("unreadable response: {}", e),
                },
            }
        } else {
            let error = response
                .json::<ErrorBody>()
                .await
                .map(|b| b.error)
                .unwrap_or_else(|_| "no error message".to_string());
            SeedOutcome::Rejected {
                status: status.as_u16(),
                error,
            }
        }
    }

    /// Submit items one after another, in order
    pub async fn run(&self, items: &[SeedItem]) -> SeedReport {
        let mut report = SeedReport::default();

        for item in items {
            let outcome = self.submit(item).await;
            debug!("Seeded '{}': {:?}", item.source, outcome);
            report.outcomes.push((item.clone(), outcome));
        }

        report
    }
}
