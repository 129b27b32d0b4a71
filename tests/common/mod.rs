//! Common test utilities and helpers

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{body::Body, http::Request, response::Response, Router};
use feedback_triage::{
    build_router, counter::DEFAULT_QUEUE_CAPACITY, AppState, Classification, Classifier,
    Judgment, LibsqlStorage, Sentiment, StorageBackend, ThemeCounter, Urgency,
};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;

/// Create a LibSQL storage in a fresh temporary directory
///
/// Keep the returned `TempDir` alive for as long as the storage is used.
pub async fn create_test_storage() -> (TempDir, Arc<dyn StorageBackend>) {
    // A temporary file instead of :memory: because libSQL's :memory: mode
    // gives every connection its own database
    let dir = TempDir::new().expect("Failed to create temp dir");
    let storage = LibsqlStorage::open(dir.path().join("feedback.db"))
        .await
        .expect("Failed to create test storage");
    (dir, Arc::new(storage))
}

/// Router over temp storage with the given classifier
pub async fn create_test_app(classifier: Option<Arc<dyn Classifier>>) -> (TempDir, Router) {
    let (dir, storage) = create_test_storage().await;
    let counter = ThemeCounter::spawn(storage.clone(), DEFAULT_QUEUE_CAPACITY);
    (dir, build_router(AppState::new(storage, classifier, counter)))
}

/// Always answers with the same judgment
pub struct FixedClassifier(pub Judgment);

#[async_trait]
impl Classifier for FixedClassifier {
    async fn classify(&self, _text: &str) -> Classification {
        Classification::Classified(self.0.clone())
    }
}

/// Always degrades, like an unreachable model
pub struct DegradedClassifier;

#[async_trait]
impl Classifier for DegradedClassifier {
    async fn classify(&self, _text: &str) -> Classification {
        Classification::Degraded
    }
}

/// Picks a judgment from words in the text
pub struct KeywordClassifier;

#[async_trait]
impl Classifier for KeywordClassifier {
    async fn classify(&self, text: &str) -> Classification {
        let lower = text.to_lowercase();
        let judgment = if lower.contains("crash") || lower.contains("error") {
            judgment("bug", Sentiment::Negative, Urgency::High)
        } else if lower.contains("slow") || lower.contains("load") {
            judgment("performance", Sentiment::Negative, Urgency::Medium)
        } else if lower.contains("love") || lower.contains("great") {
            judgment("praise", Sentiment::Positive, Urgency::Low)
        } else {
            judgment("feature-request", Sentiment::Neutral, Urgency::Low)
        };
        Classification::Classified(judgment)
    }
}

pub fn judgment(theme: &str, sentiment: Sentiment, urgency: Urgency) -> Judgment {
    Judgment {
        theme: Some(theme.to_string()),
        sentiment: Some(sentiment),
        urgency: Some(urgency),
        summary: Some(format!("{} feedback", theme)),
    }
}

pub fn post_feedback(body: Value) -> Request<Body> {
    post_raw(&body.to_string())
}

pub fn post_raw(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/feedback")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
