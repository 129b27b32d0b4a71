//! Core data types for the feedback triage service
//!
//! Feedback rows, the classifier's enumerated judgments, per-theme tallies and
//! the ranked view served by the summary endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Source recorded when the submitter does not name one
pub const DEFAULT_SOURCE: &str = "unknown";

/// Sentiment judged by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }
}

impl FromStr for Sentiment {
    type Err = String;

    /// Exact lowercase match; anything else is rejected rather than coerced.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positive" => Ok(Sentiment::Positive),
            "negative" => Ok(Sentiment::Negative),
            "neutral" => Ok(Sentiment::Neutral),
            other => Err(format!("unknown sentiment: {}", other)),
        }
    }
}

/// Urgency judged by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Low => "low",
            Urgency::Medium => "medium",
            Urgency::High => "high",
        }
    }
}

impl FromStr for Urgency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Urgency::Low),
            "medium" => Ok(Urgency::Medium),
            "high" => Ok(Urgency::High),
            other => Err(format!("unknown urgency: {}", other)),
        }
    }
}

/// Classifier fields attached to a feedback row
///
/// Every field is independently optional: a partially valid model answer keeps
/// the fields that passed validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Judgment {
    pub theme: Option<String>,
    pub sentiment: Option<Sentiment>,
    pub urgency: Option<Urgency>,
    pub summary: Option<String>,
}

/// Feedback accepted from a submitter, before it is persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFeedback {
    /// Trimmed, non-empty text
    pub text: String,
    pub source: String,
    pub judgment: Judgment,
}

/// A persisted feedback row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackItem {
    pub id: i64,
    pub text: String,
    pub source: String,
    pub theme: Option<String>,
    pub sentiment: Option<Sentiment>,
    pub urgency: Option<Urgency>,
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Occurrence tally for one theme
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeCount {
    pub theme: String,
    pub count: u64,
}

/// A feedback row annotated with its importance score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedFeedback {
    #[serde(flatten)]
    pub item: FeedbackItem,
    pub importance: u8,
}

/// Body of the summary endpoint
///
/// Serialized untagged so both variants are a plain JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Summary {
    /// Importance-ordered rows (classification enabled)
    Ranked(Vec<RankedFeedback>),
    /// Newest-first rows with no score (classification disabled)
    Chronological(Vec<FeedbackItem>),
}

impl Summary {
    pub fn len(&self) -> usize {
        match self {
            Summary::Ranked(rows) => rows.len(),
            Summary::Chronological(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
