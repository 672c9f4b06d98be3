//! Promotion of generated findings into the risk register and POA&M.
//!
//! Promotion copies a finding into a new record that remembers its source;
//! the assessment holding the finding is never modified.

use chrono::NaiveDate;
use std::sync::Arc;
use tracing::info;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Assessment, Finding, PoamItem, RecordId, Risk};
use crate::domain::ports::{RecordQuery, RecordStore, Repository, Resource};

pub struct FindingService {
    assessments: Repository<Assessment>,
    risks: Repository<Risk>,
    poams: Repository<PoamItem>,
}

impl FindingService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            assessments: Repository::new(Arc::clone(&store)),
            risks: Repository::new(Arc::clone(&store)),
            poams: Repository::new(store),
        }
    }

    /// Copy a finding into a new open risk.
    pub async fn promote_to_risk(
        &self,
        assessment_id: &RecordId,
        finding_id: &str,
    ) -> DomainResult<Risk> {
        let (assessment, finding) = self.locate(assessment_id, finding_id).await?;
        ensure_unpromoted(&self.risks, &finding).await?;

        let risk = self
            .risks
            .create(&Risk::from_finding(assessment.client_id, &finding))
            .await?;
        info!(finding_id = %finding.id, risk_id = ?risk.id, "finding promoted to risk");
        Ok(risk)
    }

    /// Copy a finding into a new open POA&M item.
    pub async fn promote_to_poam(
        &self,
        assessment_id: &RecordId,
        finding_id: &str,
        scheduled_completion: Option<NaiveDate>,
    ) -> DomainResult<PoamItem> {
        let (assessment, finding) = self.locate(assessment_id, finding_id).await?;
        ensure_unpromoted(&self.poams, &finding).await?;

        let item = PoamItem::from_finding(assessment.client_id, &finding)
            .with_scheduled_completion(scheduled_completion);
        let item = self.poams.create(&item).await?;
        info!(finding_id = %finding.id, poam_id = ?item.id, "finding promoted to POA&M");
        Ok(item)
    }

    async fn locate(
        &self,
        assessment_id: &RecordId,
        finding_id: &str,
    ) -> DomainResult<(Assessment, Finding)> {
        let assessment = self.assessments.require(assessment_id).await?;
        let finding = assessment
            .find_finding(finding_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("findings", finding_id))?;
        Ok((assessment, finding))
    }
}

async fn ensure_unpromoted<T: Resource>(target: &Repository<T>, finding: &Finding) -> DomainResult<()> {
    let existing = target
        .list(&RecordQuery::new().eq("sourceFinding", &finding.id))
        .await?;

    match existing.first() {
        Some(record) => Err(DomainError::AlreadyPromoted {
            finding_id: finding.id.to_string(),
            target: T::COLLECTION.to_string(),
            record_id: record.id().map(ToString::to_string).unwrap_or_default(),
        }),
        None => Ok(()),
    }
}
