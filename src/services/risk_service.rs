//! Risk register.

use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{RecordId, Risk, RiskStatus};
use crate::domain::ports::{RecordQuery, RecordStore, Repository};

pub struct RiskService {
    risks: Repository<Risk>,
}

impl RiskService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            risks: Repository::new(store),
        }
    }

    pub async fn create(&self, risk: Risk) -> DomainResult<Risk> {
        risk.validate().map_err(DomainError::ValidationFailed)?;
        let risk = self.risks.create(&risk).await?;
        info!(id = ?risk.id, rating = risk.rating(), "risk registered");
        Ok(risk)
    }

    pub async fn get(&self, id: &RecordId) -> DomainResult<Option<Risk>> {
        self.risks.get(id).await
    }

    /// Risks of a client, highest rating first.
    pub async fn list(
        &self,
        client_id: Option<&RecordId>,
        status: Option<RiskStatus>,
    ) -> DomainResult<Vec<Risk>> {
        let query = RecordQuery::new()
            .eq_opt("clientId", client_id)
            .eq_opt("status", status);

        let mut risks = self.risks.list(&query).await?;
        risks.sort_by(|a, b| {
            b.rating()
                .cmp(&a.rating())
                .then_with(|| b.created_date.cmp(&a.created_date))
        });
        Ok(risks)
    }

    pub async fn update_status(&self, id: &RecordId, status: RiskStatus) -> DomainResult<Risk> {
        let risk = self.risks.patch(id, json!({ "status": status })).await?;
        info!(id = %id, status = %status, "risk status updated");
        Ok(risk)
    }

    pub async fn delete(&self, id: &RecordId) -> DomainResult<()> {
        self.risks.delete(id).await
    }
}
