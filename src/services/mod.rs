//! Services layer for the feedback triage service
//!
//! Provides LLM-backed feedback classification.

pub mod classifier;

pub use classifier::{Classification, Classifier, LlmClassifier, LlmConfig};
