//! grcboard - Governance, Risk and Compliance dashboard
//!
//! grcboard scores security assessments, turns weak answers into findings and
//! tracks the records that follow from them: incidents, risks, POA&M items,
//! NIST SP 800-53 controls, information systems and their ATO status.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Records, scoring inputs, errors and the storage port
//! - **Service Layer** (`services`): Scoring, promotion, record workflows and reporting
//! - **Infrastructure Layer** (`infrastructure`): REST client, JSON file store, config and logging
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use grcboard::services::{evaluate, question_set};
//! use grcboard::domain::models::{AnswerMap, AssessmentKind};
//!
//! let outcome = evaluate(question_set(AssessmentKind::Basic), &AnswerMap::new());
//! assert_eq!(outcome.score, 0);
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    Assessment, AssessmentKind, Config, Control, Finding, Incident, PoamItem, RecordId, Risk,
    Severity, System,
};
pub use domain::ports::{RecordQuery, RecordStore, Repository, Resource};
pub use domain::{DomainError, DomainResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{evaluate, question_set, ScoreOutcome};
