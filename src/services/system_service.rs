//! Information systems and the ATO workflow.

use chrono::NaiveDate;
use std::sync::Arc;
use tracing::info;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{AtoStatus, RecordId, System};
use crate::domain::ports::{RecordQuery, RecordStore, Repository};

pub struct SystemService {
    systems: Repository<System>,
}

impl SystemService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            systems: Repository::new(store),
        }
    }

    pub async fn create(&self, system: System) -> DomainResult<System> {
        system.validate().map_err(DomainError::ValidationFailed)?;
        let system = self.systems.create(&system).await?;
        info!(id = ?system.id, name = %system.name, "system registered");
        Ok(system)
    }

    pub async fn get(&self, id: &RecordId) -> DomainResult<Option<System>> {
        self.systems.get(id).await
    }

    /// Systems of a client sorted by name.
    pub async fn list(
        &self,
        client_id: Option<&RecordId>,
        status: Option<AtoStatus>,
    ) -> DomainResult<Vec<System>> {
        let query = RecordQuery::new()
            .eq_opt("clientId", client_id)
            .eq_opt("atoStatus", status);

        let mut systems = self.systems.list(&query).await?;
        systems.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(systems)
    }

    /// Move a system to the next RMF step.
    pub async fn advance(&self, id: &RecordId) -> DomainResult<System> {
        let mut system = self.systems.require(id).await?;
        let from = system.ato_status;
        let to = from.next().ok_or_else(|| DomainError::InvalidTransition {
            from: from.to_string(),
            to: "next step".to_string(),
        })?;

        system.ato_status = to;
        let system = self.systems.update(&system).await?;
        info!(id = %id, from = %from, to = %to, "ATO step advanced");
        Ok(system)
    }

    /// Grant authorization to a system awaiting its decision.
    pub async fn authorize(
        &self,
        id: &RecordId,
        official: &str,
        on: NaiveDate,
    ) -> DomainResult<System> {
        if official.trim().is_empty() {
            return Err(DomainError::ValidationFailed(
                "Authorizing official cannot be empty".to_string(),
            ));
        }

        let mut system = self.systems.require(id).await?;
        ensure_awaiting_decision(&system, AtoStatus::Authorized)?;

        system.grant_authorization(official.trim(), on);
        let system = self.systems.update(&system).await?;
        info!(id = %id, official = %official, expires = ?system.expiration_date, "system authorized");
        Ok(system)
    }

    /// Deny authorization to a system awaiting its decision.
    pub async fn deny(&self, id: &RecordId) -> DomainResult<System> {
        let mut system = self.systems.require(id).await?;
        ensure_awaiting_decision(&system, AtoStatus::Denied)?;

        system.ato_status = AtoStatus::Denied;
        let system = self.systems.update(&system).await?;
        info!(id = %id, "system authorization denied");
        Ok(system)
    }

    /// Authorized systems whose authorization lapsed before `today`.
    pub async fn expired(
        &self,
        client_id: Option<&RecordId>,
        today: NaiveDate,
    ) -> DomainResult<Vec<System>> {
        let mut systems = self.list(client_id, Some(AtoStatus::Authorized)).await?;
        systems.retain(|s| s.is_ato_expired(today));
        Ok(systems)
    }

    pub async fn delete(&self, id: &RecordId) -> DomainResult<()> {
        self.systems.delete(id).await
    }
}

fn ensure_awaiting_decision(system: &System, to: AtoStatus) -> DomainResult<()> {
    if system.ato_status == AtoStatus::Authorize {
        Ok(())
    } else {
        Err(DomainError::InvalidTransition {
            from: system.ato_status.to_string(),
            to: to.to_string(),
        })
    }
}
