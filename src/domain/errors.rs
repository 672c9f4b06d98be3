//! Domain errors for grcboard.

use thiserror::Error;

/// Domain-level errors that can occur while working with GRC records.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{collection} record not found: {id}")]
    NotFound { collection: String, id: String },

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Assessment is incomplete, unanswered questions: {}", .0.join(", "))]
    IncompleteAssessment(Vec<String>),

    #[error("Finding {finding_id} was already promoted to {target} {record_id}")]
    AlreadyPromoted {
        finding_id: String,
        target: String,
        record_id: String,
    },

    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Record store error: {0}")]
    Store(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Shorthand for a missing record in a named collection.
    pub fn not_found(collection: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            collection: collection.into(),
            id: id.to_string(),
        }
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
