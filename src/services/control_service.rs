//! Security control catalog and implementation tracking.

use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Control, ImplementationStatus, RecordId};
use crate::domain::ports::{RecordQuery, RecordStore, Repository};

/// Filter criteria for listing controls.
#[derive(Debug, Clone, Default)]
pub struct ControlFilter {
    /// Family code such as `AC`, matched case-insensitively
    pub family: Option<String>,
    pub status: Option<ImplementationStatus>,
    pub system_id: Option<RecordId>,
}

/// Implementation counts over a set of controls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceSummary {
    pub total: usize,
    pub implemented: usize,
    pub partially_implemented: usize,
    pub planned: usize,
    pub not_implemented: usize,
    pub not_applicable: usize,
    /// Implemented share of applicable controls, 0 to 100
    pub percentage: u8,
}

impl ComplianceSummary {
    pub fn from_controls(controls: &[Control]) -> Self {
        let mut summary = Self {
            total: controls.len(),
            ..Self::default()
        };
        for control in controls {
            match control.implementation_status {
                ImplementationStatus::Implemented => summary.implemented += 1,
                ImplementationStatus::PartiallyImplemented => summary.partially_implemented += 1,
                ImplementationStatus::Planned => summary.planned += 1,
                ImplementationStatus::NotImplemented => summary.not_implemented += 1,
                ImplementationStatus::NotApplicable => summary.not_applicable += 1,
            }
        }

        let applicable = summary.total - summary.not_applicable;
        if applicable > 0 {
            #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let pct = (100.0 * summary.implemented as f64 / applicable as f64).round() as u8;
            summary.percentage = pct.min(100);
        }
        summary
    }
}

pub struct ControlService {
    controls: Repository<Control>,
}

impl ControlService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            controls: Repository::new(store),
        }
    }

    /// Controls matching the filter in catalog order.
    pub async fn list(&self, filter: &ControlFilter) -> DomainResult<Vec<Control>> {
        let query = RecordQuery::new()
            .eq_opt("implementationStatus", filter.status)
            .eq_opt("systemId", filter.system_id.as_ref());

        let mut controls = self.controls.list(&query).await?;
        if let Some(family) = &filter.family {
            let family = family.trim().to_uppercase();
            controls.retain(|c| c.family_code() == family);
        }
        controls.sort_by_key(Control::sort_key);
        Ok(controls)
    }

    pub async fn get(&self, id: &RecordId) -> DomainResult<Option<Control>> {
        self.controls.get(id).await
    }

    pub async fn update_status(
        &self,
        id: &RecordId,
        status: ImplementationStatus,
    ) -> DomainResult<Control> {
        let control = self
            .controls
            .patch(id, json!({ "implementationStatus": status }))
            .await?;
        info!(id = %id, status = %status, "control status updated");
        Ok(control)
    }

    pub async fn compliance(&self, filter: &ControlFilter) -> DomainResult<ComplianceSummary> {
        let controls = self.list(filter).await?;
        Ok(ComplianceSummary::from_controls(&controls))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn control(id: &str, status: ImplementationStatus) -> Control {
        Control {
            id: Some(RecordId::from(id)),
            family: String::new(),
            title: id.to_string(),
            description: String::new(),
            implementation_status: status,
            system_id: None,
            responsible_role: None,
        }
    }

    #[test]
    fn test_compliance_excludes_not_applicable() {
        let controls = vec![
            control("AC-1", ImplementationStatus::Implemented),
            control("AC-2", ImplementationStatus::Implemented),
            control("AC-3", ImplementationStatus::Planned),
            control("AC-4", ImplementationStatus::NotApplicable),
        ];

        let summary = ComplianceSummary::from_controls(&controls);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.implemented, 2);
        assert_eq!(summary.not_applicable, 1);
        assert_eq!(summary.percentage, 67);
    }

    #[test]
    fn test_compliance_with_nothing_applicable() {
        let controls = vec![control("AC-1", ImplementationStatus::NotApplicable)];
        assert_eq!(ComplianceSummary::from_controls(&controls).percentage, 0);
        assert_eq!(ComplianceSummary::from_controls(&[]).percentage, 0);
    }
}
