//! Feedback classification with an LLM
//!
//! Asks Claude for a theme, sentiment, urgency and one-line summary of a piece
//! of feedback. Classification is best-effort: any failure produces
//! [`Classification::Degraded`], which callers store as-is and never retry.

use crate::error::{Result, TriageError};
use crate::types::{Judgment, Sentiment, Urgency};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Longest theme label kept, in characters
pub const MAX_THEME_CHARS: usize = 50;

/// Longest summary kept, in characters
pub const MAX_SUMMARY_CHARS: usize = 200;

/// Outcome of classifying one piece of feedback
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// The model answered with parseable JSON; invalid fields are already null
    Classified(Judgment),
    /// No usable answer; every field is null
    Degraded,
}

impl Classification {
    /// Field view of the outcome, all-null when degraded
    pub fn into_judgment(self) -> Judgment {
        match self {
            Classification::Classified(judgment) => judgment,
            Classification::Degraded => Judgment::default(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Classification::Degraded)
    }
}

/// Text-to-judgment classifier
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify feedback text. Never fails; failures degrade.
    async fn classify(&self, text: &str) -> Classification;
}

/// Configuration for the LLM classifier
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Anthropic API key
    pub api_key: String,

    /// Model to use
    pub model: String,

    /// Max tokens for responses
    pub max_tokens: usize,

    /// Temperature for sampling
    pub temperature: f32,

    /// API base URL, without the `/v1/messages` suffix
    pub api_base: String,

    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var("ANTHROPIC_API_KEY").unwrap_or_default(),
            model: "claude-3-5-haiku-20241022".to_string(),
            max_tokens: 150,
            temperature: 0.0,
            api_base: "https://api.anthropic.com".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Classifier backed by the Anthropic Messages API
pub struct LlmClassifier {
    config: LlmConfig,
    client: reqwest::Client,
}

/// Anthropic API message format
#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: usize,
    temperature: f32,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

/// Anthropic API response format
#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    text: String,
}

/// Loosely typed model answer; each field is validated separately
#[derive(Debug, Default, Deserialize)]
struct RawJudgment {
    #[serde(default)]
    theme: Option<serde_json::Value>,
    #[serde(default)]
    sentiment: Option<serde_json::Value>,
    #[serde(default)]
    urgency: Option<serde_json::Value>,
    #[serde(default)]
    summary: Option<serde_json::Value>,
}

impl LlmClassifier {
    /// Create a new classifier with custom config
    pub fn new(config: LlmConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(TriageError::Config(config::ConfigError::Message(
                "ANTHROPIC_API_KEY not set".to_string(),
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self { config, client })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn build_prompt(text: &str) -> String {
        format!(
            r#"You are a feedback classifier. Analyze the following user feedback and return ONLY valid JSON (no markdown, no explanation) with these exact fields:

- "theme": a short lowercase label, e.g. "performance", "bug", "feature-request", "ux", "praise", "reliability", "security"
- "sentiment": exactly one of "positive", "negative", "neutral"
- "urgency": exactly one of "low", "medium", "high"
- "summary": a one-line summary of the feedback, max 15 words

Feedback: "{}""#,
            text
        )
    }

    async fn try_classify(&self, text: &str) -> Result<Judgment> {
        let raw = self.call_api(&Self::build_prompt(text)).await?;
        parse_judgment(&raw)
    }

    /// Make an API call to Claude
    async fn call_api(&self, prompt: &str) -> Result<String> {
        debug!("Calling Anthropic API");

        let request = AnthropicRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        let url = format!("{}/v1/messages", self.config.api_base.trim_end_matches('/'));
        let response = self
            .client
            .post(url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(TriageError::Classifier(format!(
                "API request failed with status {}: {}",
                status, error_text
            )));
        }

        let api_response: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| TriageError::Classifier(format!("Failed to parse response: {}", e)))?;

        api_response
            .content
            .first()
            .map(|c| c.text.clone())
            .ok_or_else(|| TriageError::Classifier("Empty response from API".to_string()))
    }
}

#[async_trait]
impl Classifier for LlmClassifier {
    async fn classify(&self, text: &str) -> Classification {
        match self.try_classify(text).await {
            Ok(judgment) => Classification::Classified(judgment),
            Err(e) => {
                warn!("Classification degraded: {}", e);
                Classification::Degraded
            }
        }
    }
}

/// Remove markdown code fences the model sometimes wraps JSON in
fn strip_code_fences(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(pos) = rest.find("```") {
        out.push_str(&rest[..pos]);
        rest = &rest[pos + 3..];
        rest = rest.strip_prefix("json").unwrap_or(rest);
        rest = rest.trim_start();
    }
    out.push_str(rest);

    out.trim().to_string()
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Parse and sanitize the model's answer
///
/// Malformed JSON is an error. Individually invalid fields become `None`:
/// non-string theme/summary, and sentiment/urgency outside their enumerations.
pub fn parse_judgment(raw: &str) -> Result<Judgment> {
    let cleaned = strip_code_fences(raw);
    let parsed: RawJudgment = serde_json::from_str(&cleaned)?;

    let as_str = |v: &Option<serde_json::Value>| -> Option<String> {
        v.as_ref().and_then(|v| v.as_str()).map(str::to_string)
    };

    let theme = as_str(&parsed.theme)
        .map(|t| truncate_chars(&t.trim().to_lowercase(), MAX_THEME_CHARS))
        .filter(|t| !t.is_empty());
    let sentiment = as_str(&parsed.sentiment).and_then(|s| s.parse::<Sentiment>().ok());
    let urgency = as_str(&parsed.urgency).and_then(|s| s.parse::<Urgency>().ok());
    let summary = as_str(&parsed.summary).map(|s| truncate_chars(&s, MAX_SUMMARY_CHARS));

    Ok(Judgment {
        theme,
        sentiment,
        urgency,
        summary,
    })
}
