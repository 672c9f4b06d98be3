//! Common test utilities for integration tests
//!
//! Provides shared fixtures and answer builders used across multiple
//! integration test files.

#![allow(dead_code)]

use std::sync::Arc;
use tempfile::TempDir;

use grcboard::domain::models::{Answer, AnswerMap, AssessmentKind, QuestionKind};
use grcboard::domain::ports::RecordStore;
use grcboard::infrastructure::store::{JsonFileStore, COLLECTIONS};
use grcboard::services::question_set;

/// A JSON file store seeded with empty collections in a temporary directory
///
/// Keep the returned TempDir alive for as long as the store is used.
pub async fn file_store() -> (TempDir, Arc<dyn RecordStore>) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let store = JsonFileStore::new(dir.path().join("db.json"));
    store
        .initialize(COLLECTIONS)
        .await
        .expect("Failed to initialize database");
    (dir, Arc::new(store))
}

/// Basic answers with "yes" for every question except the listed ones
pub fn basic_answers(no: &[&str]) -> AnswerMap {
    question_set(AssessmentKind::Basic)
        .questions
        .iter()
        .map(|q| {
            let value = if no.contains(&q.id.as_str()) { "no" } else { "yes" };
            (q.id.clone(), Answer::text(value))
        })
        .collect()
}

/// Advanced answers that pass every rule
pub fn strong_advanced_answers() -> AnswerMap {
    question_set(AssessmentKind::Advanced)
        .questions
        .iter()
        .map(|q| {
            let answer = match &q.kind {
                QuestionKind::Radio { options, .. } => Answer::text(options[0].clone()),
                QuestionKind::Text { .. } => Answer::text(
                    "A documented governance charter is reviewed by the board every quarter.",
                ),
                QuestionKind::Slider { .. } => Answer::number(9),
                QuestionKind::MultiSelect { options, .. } => {
                    Answer::List(options.iter().take(3).cloned().collect())
                }
                QuestionKind::YesNo { .. } => Answer::text("yes"),
            };
            (q.id.clone(), answer)
        })
        .collect()
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
