//! End-to-end tests for the HTTP API
//!
//! Drives the full router (storage, counter and stub classifiers) through
//! `tower::ServiceExt::oneshot`.

mod common;

use async_trait::async_trait;
use axum::http::StatusCode;
use common::*;
use feedback_triage::{
    build_router, counter::DEFAULT_QUEUE_CAPACITY, AppState, Classifier, FeedbackItem,
    FeedbackOrder, NewFeedback, Result, Sentiment, StorageBackend, ThemeCount, ThemeCounter,
    TriageError, Urgency,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt; // for oneshot

#[tokio::test]
async fn test_submission_round_trip() {
    let (_dir, app) = create_test_app(Some(Arc::new(KeywordClassifier))).await;

    let response = app
        .clone()
        .oneshot(post_feedback(json!({
            "text": "App crashes when uploading files over 5MB",
            "source": "support"
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let created = json_body(response).await;
    assert_eq!(created["theme"], "bug");
    assert_eq!(created["sentiment"], "negative");
    assert_eq!(created["urgency"], "high");
    assert!(created["created_at"].is_string());

    let summary = json_body(app.oneshot(get_request("/summary")).await.unwrap()).await;
    let rows = summary.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], created["id"]);
    assert_eq!(rows[0]["text"], "App crashes when uploading files over 5MB");
    assert_eq!(rows[0]["source"], "support");
    assert_eq!(rows[0]["importance"], 9);
}

#[tokio::test]
async fn test_missing_source_defaults_to_unknown() {
    let (_dir, app) = create_test_app(Some(Arc::new(KeywordClassifier))).await;

    let response = app
        .oneshot(post_feedback(json!({ "text": "Great app" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let created = json_body(response).await;
    assert_eq!(created["source"], "unknown");
    assert_eq!(created["theme"], "praise");
}

#[tokio::test]
async fn test_rejected_bodies() {
    let (_dir, app) = create_test_app(Some(Arc::new(KeywordClassifier))).await;

    let cases: &[(&str, &str)] = &[
        (r#"{"text": "   "}"#, "\"text\" is required and must be a non-empty string"),
        (r#"{"text": 12}"#, "\"text\" is required and must be a non-empty string"),
        (r#"{"source": "email"}"#, "\"text\" is required and must be a non-empty string"),
        ("{not json", "Invalid JSON"),
    ];

    for (body, message) in cases {
        let response = app.clone().oneshot(post_raw(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {}", body);
        assert_eq!(json_body(response).await["error"], *message);
    }

    // Nothing was stored
    let summary = json_body(app.oneshot(get_request("/summary")).await.unwrap()).await;
    assert_eq!(summary, json!([]));
}

#[tokio::test]
async fn test_unknown_routes_are_not_found() {
    let (_dir, app) = create_test_app(None).await;

    let routes = [
        ("GET", "/"),
        ("GET", "/feedback"),
        ("POST", "/summary"),
        ("DELETE", "/feedback"),
    ];
    for (method, uri) in routes {
        let request = axum::http::Request::builder()
            .method(method)
            .uri(uri)
            .body(axum::body::Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{} {}", method, uri);
        assert_eq!(json_body(response).await, json!({ "error": "Not found" }));
    }
}

#[tokio::test]
async fn test_concurrent_submissions_count_every_theme() {
    let (_dir, storage) = create_test_storage().await;
    let counter = ThemeCounter::spawn(storage.clone(), DEFAULT_QUEUE_CAPACITY);
    let classifier: Arc<dyn Classifier> = Arc::new(FixedClassifier(judgment(
        "performance",
        Sentiment::Negative,
        Urgency::Medium,
    )));
    let app = build_router(AppState::new(storage.clone(), Some(classifier), counter));

    let first = tokio::spawn(
        app.clone()
            .oneshot(post_feedback(json!({ "text": "Dashboard is slow" }))),
    );
    let second = tokio::spawn(
        app.clone()
            .oneshot(post_feedback(json!({ "text": "Search is slow too" }))),
    );
    assert_eq!(first.await.unwrap().unwrap().status(), StatusCode::CREATED);
    assert_eq!(second.await.unwrap().unwrap().status(), StatusCode::CREATED);

    // The summary's snapshot is queued behind both increments
    let summary = json_body(app.oneshot(get_request("/summary")).await.unwrap()).await;
    let rows = summary.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    // medium 2 + negative 3 + most frequent theme 3
    assert!(rows.iter().all(|r| r["importance"] == 8));

    assert_eq!(
        storage.theme_counts().await.unwrap(),
        vec![ThemeCount {
            theme: "performance".to_string(),
            count: 2,
        }]
    );
}

#[tokio::test]
async fn test_degraded_classification_is_stored_unscored() {
    let (_dir, app) = create_test_app(Some(Arc::new(DegradedClassifier))).await;

    let response = app
        .clone()
        .oneshot(post_feedback(json!({ "text": "Something happened", "source": "email" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let created = json_body(response).await;
    for field in ["theme", "sentiment", "urgency", "summary"] {
        assert_eq!(created[field], Value::Null, "{}", field);
    }

    let summary = json_body(app.oneshot(get_request("/summary")).await.unwrap()).await;
    assert_eq!(summary[0]["importance"], 0);
}

#[tokio::test]
async fn test_summary_ranks_by_importance() {
    let (_dir, app) = create_test_app(Some(Arc::new(KeywordClassifier))).await;

    let texts = [
        "Would be nice to have keyboard shortcuts",
        "App crashes on upload",
        "Love the new dark mode",
        "Getting 500 errors on billing",
        "Dashboard takes forever to load",
    ];
    for text in texts {
        let response = app
            .clone()
            .oneshot(post_feedback(json!({ "text": text })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let summary = json_body(app.oneshot(get_request("/summary")).await.unwrap()).await;
    let scores: Vec<u64> = summary
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["importance"].as_u64().unwrap())
        .collect();

    // bug x2 (max count 2): 3+3+3; performance x1: 2+3+2; praise/feature x1: 1+1+2, 1+2+2
    assert_eq!(scores, vec![9, 9, 7, 5, 4]);
    assert_eq!(summary[0]["text"], "App crashes on upload");
    assert_eq!(summary[1]["text"], "Getting 500 errors on billing");
}

#[tokio::test]
async fn test_summary_without_classifier_is_newest_first() {
    let (_dir, app) = create_test_app(None).await;

    for text in ["first", "second", "third"] {
        app.clone()
            .oneshot(post_feedback(json!({ "text": text })))
            .await
            .unwrap();
    }

    let summary = json_body(app.oneshot(get_request("/summary")).await.unwrap()).await;
    let rows = summary.as_array().unwrap();
    let texts: Vec<&str> = rows.iter().map(|r| r["text"].as_str().unwrap()).collect();
    assert_eq!(texts, vec!["third", "second", "first"]);
    assert!(rows.iter().all(|r| r.get("importance").is_none()));
    assert!(rows.iter().all(|r| r["theme"].is_null()));
}

/// Delegates to real storage but every theme increment fails
struct BrokenTallies(Arc<dyn StorageBackend>);

#[async_trait]
impl StorageBackend for BrokenTallies {
    async fn insert_feedback(&self, feedback: &NewFeedback) -> Result<FeedbackItem> {
        self.0.insert_feedback(feedback).await
    }

    async fn list_feedback(&self, order: FeedbackOrder) -> Result<Vec<FeedbackItem>> {
        self.0.list_feedback(order).await
    }

    async fn increment_theme(&self, _theme: &str) -> Result<()> {
        Err(TriageError::Database("disk I/O error".to_string()))
    }

    async fn theme_counts(&self) -> Result<Vec<ThemeCount>> {
        self.0.theme_counts().await
    }
}

#[tokio::test]
async fn test_counter_failures_do_not_affect_submissions() {
    let (_dir, inner) = create_test_storage().await;
    let storage: Arc<dyn StorageBackend> = Arc::new(BrokenTallies(inner));
    // Capacity 1 so back-to-back submissions also hit a full queue
    let counter = ThemeCounter::spawn(storage.clone(), 1);
    let classifier: Arc<dyn Classifier> = Arc::new(FixedClassifier(judgment(
        "performance",
        Sentiment::Negative,
        Urgency::Medium,
    )));
    let app = build_router(AppState::new(storage, Some(classifier), counter));

    for i in 0..5 {
        let response = app
            .clone()
            .oneshot(post_feedback(json!({ "text": format!("Slow page {}", i) })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app.oneshot(get_request("/summary")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let summary = json_body(response).await;
    let rows = summary.as_array().unwrap();
    assert_eq!(rows.len(), 5);
    // No tally was ever stored: medium 2 + negative 3 + uncounted theme 1
    assert!(rows.iter().all(|r| r["importance"] == 6));
}
