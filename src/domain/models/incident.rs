//! Security incident domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{RecordId, Severity};
use crate::domain::ports::Resource;

/// Handling status of an incident.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentStatus {
    #[default]
    Open,
    Investigating,
    Contained,
    Resolved,
    Closed,
}

impl_labels!(IncidentStatus {
    Open => "open",
    Investigating => "investigating",
    Contained => "contained",
    Resolved => "resolved",
    Closed => "closed",
});

impl IncidentStatus {
    /// Resolved and closed incidents no longer count as open.
    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::Resolved | Self::Closed)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub client_id: RecordId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub severity: Severity,
    #[serde(default)]
    pub status: IncidentStatus,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub reported_by: String,
    pub reported_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_date: Option<DateTime<Utc>>,
}

impl Incident {
    pub fn new(client_id: RecordId, title: impl Into<String>, severity: Severity) -> Self {
        Self {
            id: None,
            client_id,
            title: title.into(),
            description: String::new(),
            severity,
            status: IncidentStatus::Open,
            category: String::new(),
            reported_by: String::new(),
            reported_date: Utc::now(),
            resolved_date: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_reporter(mut self, reported_by: impl Into<String>) -> Self {
        self.reported_by = reported_by.into();
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Incident title cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Resource for Incident {
    const COLLECTION: &'static str = "incidents";

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_incident_is_open() {
        let incident = Incident::new("1".into(), "Phishing email", Severity::High)
            .with_category("Phishing")
            .with_reporter("soc@example.com");

        assert_eq!(incident.status, IncidentStatus::Open);
        assert!(incident.resolved_date.is_none());
        assert!(incident.validate().is_ok());
    }

    #[test]
    fn test_blank_title_rejected() {
        let incident = Incident::new("1".into(), "   ", Severity::Low);
        assert!(incident.validate().is_err());
    }

    #[test]
    fn test_closed_states() {
        assert!(IncidentStatus::Resolved.is_closed());
        assert!(IncidentStatus::Closed.is_closed());
        assert!(!IncidentStatus::Contained.is_closed());
    }
}
