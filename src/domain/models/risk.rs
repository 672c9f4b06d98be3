//! Risk register domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Finding, RecordId, Severity};
use crate::domain::ports::Resource;

/// Three-point scale used for both likelihood and impact.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl_labels!(RiskLevel {
    Low => "low",
    Medium => "medium",
    High => "high",
});

impl RiskLevel {
    pub const fn rank(&self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }

    /// Impact a promoted finding starts with.
    pub const fn from_severity(severity: Severity) -> Self {
        match severity {
            Severity::Low => Self::Low,
            Severity::Medium => Self::Medium,
            Severity::High | Severity::Critical => Self::High,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskStatus {
    #[default]
    Open,
    Mitigating,
    Accepted,
    Closed,
}

impl_labels!(RiskStatus {
    Open => "open",
    Mitigating => "mitigating",
    Accepted => "accepted",
    Closed => "closed",
});

impl RiskStatus {
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Open | Self::Mitigating)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Risk {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub client_id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_id: Option<RecordId>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub likelihood: RiskLevel,
    #[serde(default)]
    pub impact: RiskLevel,
    #[serde(default)]
    pub status: RiskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_finding: Option<RecordId>,
    pub created_date: DateTime<Utc>,
}

impl Risk {
    pub fn new(client_id: RecordId, title: impl Into<String>) -> Self {
        Self {
            id: None,
            client_id,
            system_id: None,
            title: title.into(),
            description: String::new(),
            category: String::new(),
            likelihood: RiskLevel::Medium,
            impact: RiskLevel::Medium,
            status: RiskStatus::Open,
            owner: None,
            source_finding: None,
            created_date: Utc::now(),
        }
    }

    /// Copy a finding into a new open risk.
    pub fn from_finding(client_id: RecordId, finding: &Finding) -> Self {
        Self {
            description: finding.description.clone(),
            category: finding.category.clone(),
            impact: RiskLevel::from_severity(finding.severity),
            source_finding: Some(finding.id.clone()),
            ..Self::new(client_id, finding.title.clone())
        }
    }

    /// Likelihood rank times impact rank, 1..=9.
    pub const fn rating(&self) -> u8 {
        self.likelihood.rank() * self.impact.rank()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Risk title cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Resource for Risk {
    const COLLECTION: &'static str = "risks";

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }
}
