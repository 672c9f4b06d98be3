//! Plan of Action and Milestones (POA&M) domain model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{Finding, RecordId, Severity};
use crate::domain::ports::Resource;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoamStatus {
    #[default]
    Open,
    InProgress,
    Completed,
    RiskAccepted,
}

impl_labels!(PoamStatus {
    Open => "open",
    InProgress => "in_progress",
    Completed => "completed",
    RiskAccepted => "risk_accepted",
});

impl PoamStatus {
    /// Completed and risk-accepted items need no further remediation.
    pub const fn is_done(&self) -> bool {
        matches!(self, Self::Completed | Self::RiskAccepted)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub description: String,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoamItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub client_id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_id: Option<String>,
    pub weakness: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub status: PoamStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_of_contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_completion: Option<NaiveDate>,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_finding: Option<RecordId>,
    pub created_date: DateTime<Utc>,
}

impl PoamItem {
    pub fn new(client_id: RecordId, weakness: impl Into<String>, severity: Severity) -> Self {
        Self {
            id: None,
            client_id,
            system_id: None,
            control_id: None,
            weakness: weakness.into(),
            description: String::new(),
            severity,
            status: PoamStatus::Open,
            point_of_contact: None,
            scheduled_completion: None,
            milestones: Vec::new(),
            source_finding: None,
            created_date: Utc::now(),
        }
    }

    /// Copy a finding into a new open POA&M item; the recommendation becomes
    /// part of the remediation description.
    pub fn from_finding(client_id: RecordId, finding: &Finding) -> Self {
        let description = if finding.recommendation.is_empty() {
            finding.description.clone()
        } else {
            format!(
                "{}\n\nRecommended remediation: {}",
                finding.description, finding.recommendation
            )
        };

        Self {
            description,
            source_finding: Some(finding.id.clone()),
            ..Self::new(client_id, finding.title.clone(), finding.severity)
        }
    }

    pub fn with_scheduled_completion(mut self, date: Option<NaiveDate>) -> Self {
        self.scheduled_completion = date;
        self
    }

    /// Past its scheduled completion date and not yet done.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.status.is_done() && self.scheduled_completion.is_some_and(|due| due < today)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.weakness.trim().is_empty() {
            return Err("POA&M weakness cannot be empty".to_string());
        }
        if self.milestones.iter().any(|m| m.description.trim().is_empty()) {
            return Err("Milestone description cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Resource for PoamItem {
    const COLLECTION: &'static str = "poams";

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }
}
