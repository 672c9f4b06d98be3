//! Finding domain model.
//!
//! Findings are deficiency records generated from assessment answers. They are
//! stamped once at submission time and travel inside the stored assessment.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RecordId;

/// Severity shared by findings, incidents and POA&M items.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl_labels!(Severity {
    Low => "low",
    Medium => "medium",
    High => "high",
    Critical => "critical",
});

/// Lifecycle status of a finding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
    Accepted,
}

impl_labels!(FindingStatus {
    Open => "open",
    InProgress => "in_progress",
    Resolved => "resolved",
    Accepted => "accepted",
});

/// Static description of the finding a question emits when its answer fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FindingTemplate {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub category: String,
    pub recommendation: String,
}

impl FindingTemplate {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        severity: Severity,
        category: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity,
            category: category.into(),
            recommendation: recommendation.into(),
        }
    }
}

/// A generated deficiency record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub id: RecordId,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub category: String,
    pub recommendation: String,
    #[serde(default)]
    pub status: FindingStatus,
    pub source_question: String,
    pub created_date: DateTime<Utc>,
}

impl Finding {
    /// Stamp a template with a fresh id, its source question and `open` status.
    pub fn from_template(
        template: &FindingTemplate,
        source_question: impl Into<String>,
        created_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: RecordId::generate(),
            title: template.title.clone(),
            description: template.description.clone(),
            severity: template.severity,
            category: template.category.clone(),
            recommendation: template.recommendation.clone(),
            status: FindingStatus::Open,
            source_question: source_question.into(),
            created_date,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
