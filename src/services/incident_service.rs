//! Incident tracking.

use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Incident, IncidentStatus, RecordId, Severity};
use crate::domain::ports::{RecordQuery, RecordStore, Repository};

/// Filter criteria for listing incidents.
#[derive(Debug, Clone, Default)]
pub struct IncidentFilter {
    pub client_id: Option<RecordId>,
    pub status: Option<IncidentStatus>,
    pub severity: Option<Severity>,
    /// Exclude resolved and closed incidents
    pub open_only: bool,
}

pub struct IncidentService {
    incidents: Repository<Incident>,
}

impl IncidentService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            incidents: Repository::new(store),
        }
    }

    pub async fn report(&self, incident: Incident) -> DomainResult<Incident> {
        incident.validate().map_err(DomainError::ValidationFailed)?;
        let incident = self.incidents.create(&incident).await?;
        info!(id = ?incident.id, severity = %incident.severity, "incident reported");
        Ok(incident)
    }

    pub async fn get(&self, id: &RecordId) -> DomainResult<Option<Incident>> {
        self.incidents.get(id).await
    }

    /// Incidents matching the filter, most severe first, newest first within
    /// a severity.
    pub async fn list(&self, filter: &IncidentFilter) -> DomainResult<Vec<Incident>> {
        let query = RecordQuery::new()
            .eq_opt("clientId", filter.client_id.as_ref())
            .eq_opt("status", filter.status)
            .eq_opt("severity", filter.severity);

        let mut incidents = self.incidents.list(&query).await?;
        if filter.open_only {
            incidents.retain(|i| !i.status.is_closed());
        }
        incidents.sort_by(|a, b| {
            b.severity
                .cmp(&a.severity)
                .then_with(|| b.reported_date.cmp(&a.reported_date))
        });
        Ok(incidents)
    }

    /// Move an incident to a new status, stamping the resolution date when it
    /// is resolved or closed.
    pub async fn update_status(
        &self,
        id: &RecordId,
        status: IncidentStatus,
    ) -> DomainResult<Incident> {
        let current = self.incidents.require(id).await?;

        let mut changes = json!({ "status": status });
        if status.is_closed() && current.resolved_date.is_none() {
            changes["resolvedDate"] = json!(Utc::now());
        }

        let incident = self.incidents.patch(id, changes).await?;
        info!(id = %id, from = %current.status, to = %status, "incident status updated");
        Ok(incident)
    }

    pub async fn delete(&self, id: &RecordId) -> DomainResult<()> {
        self.incidents.delete(id).await?;
        info!(id = %id, "incident deleted");
        Ok(())
    }
}
