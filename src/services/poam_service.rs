//! Plan of Action and Milestones tracking.

use chrono::NaiveDate;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Milestone, PoamItem, PoamStatus, RecordId};
use crate::domain::ports::{RecordQuery, RecordStore, Repository};

pub struct PoamService {
    poams: Repository<PoamItem>,
}

impl PoamService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            poams: Repository::new(store),
        }
    }

    pub async fn create(&self, item: PoamItem) -> DomainResult<PoamItem> {
        item.validate().map_err(DomainError::ValidationFailed)?;
        let item = self.poams.create(&item).await?;
        info!(id = ?item.id, severity = %item.severity, "POA&M item created");
        Ok(item)
    }

    pub async fn get(&self, id: &RecordId) -> DomainResult<Option<PoamItem>> {
        self.poams.get(id).await
    }

    /// Items of a client ordered by scheduled completion, unscheduled last.
    pub async fn list(
        &self,
        client_id: Option<&RecordId>,
        status: Option<PoamStatus>,
    ) -> DomainResult<Vec<PoamItem>> {
        let query = RecordQuery::new()
            .eq_opt("clientId", client_id)
            .eq_opt("status", status);

        let mut items = self.poams.list(&query).await?;
        items.sort_by_key(|item| (item.scheduled_completion.is_none(), item.scheduled_completion));
        Ok(items)
    }

    /// Open items past their scheduled completion on `today`.
    pub async fn overdue(
        &self,
        client_id: Option<&RecordId>,
        today: NaiveDate,
    ) -> DomainResult<Vec<PoamItem>> {
        let mut items = self.list(client_id, None).await?;
        items.retain(|item| item.is_overdue(today));
        Ok(items)
    }

    pub async fn update_status(&self, id: &RecordId, status: PoamStatus) -> DomainResult<PoamItem> {
        let item = self.poams.patch(id, json!({ "status": status })).await?;
        info!(id = %id, status = %status, "POA&M status updated");
        Ok(item)
    }

    pub async fn add_milestone(&self, id: &RecordId, milestone: Milestone) -> DomainResult<PoamItem> {
        let mut item = self.poams.require(id).await?;
        item.milestones.push(milestone);
        item.validate().map_err(DomainError::ValidationFailed)?;
        self.poams.update(&item).await
    }

    /// Mark the milestone at `index` (zero-based) complete.
    pub async fn complete_milestone(&self, id: &RecordId, index: usize) -> DomainResult<PoamItem> {
        let mut item = self.poams.require(id).await?;
        let count = item.milestones.len();
        let milestone = item.milestones.get_mut(index).ok_or_else(|| {
            DomainError::ValidationFailed(format!(
                "POA&M {id} has {count} milestone(s), no milestone at index {index}"
            ))
        })?;
        milestone.completed = true;
        self.poams.update(&item).await
    }

    pub async fn delete(&self, id: &RecordId) -> DomainResult<()> {
        self.poams.delete(id).await
    }
}
