//! Client dashboard summary.

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use crate::domain::errors::DomainResult;
use crate::domain::models::{
    Assessment, AssessmentKind, AtoStatus, Control, FindingStatus, Incident, PoamItem, RecordId,
    Risk, Severity, System,
};
use crate::domain::ports::{RecordQuery, RecordStore, Repository};
use crate::services::control_service::ComplianceSummary;

/// Headline numbers for one client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub client_id: RecordId,
    pub as_of: NaiveDate,
    pub basic_score: Option<u8>,
    pub advanced_score: Option<u8>,
    pub assessments: usize,
    /// Open findings of the latest assessment of each kind
    pub open_findings: BTreeMap<Severity, usize>,
    pub open_incidents: usize,
    pub open_risks: usize,
    pub high_risks: usize,
    pub open_poams: usize,
    pub overdue_poams: usize,
    /// Catalog-wide, controls are not client scoped
    pub compliance: ComplianceSummary,
    pub systems_by_status: BTreeMap<String, usize>,
    pub expired_atos: usize,
}

/// Rating at or above which a risk counts as high.
const HIGH_RISK_RATING: u8 = 6;

pub struct ReportService {
    assessments: Repository<Assessment>,
    incidents: Repository<Incident>,
    risks: Repository<Risk>,
    poams: Repository<PoamItem>,
    controls: Repository<Control>,
    systems: Repository<System>,
}

impl ReportService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            assessments: Repository::new(Arc::clone(&store)),
            incidents: Repository::new(Arc::clone(&store)),
            risks: Repository::new(Arc::clone(&store)),
            poams: Repository::new(Arc::clone(&store)),
            controls: Repository::new(Arc::clone(&store)),
            systems: Repository::new(store),
        }
    }

    pub async fn summary(&self, client_id: &RecordId) -> DomainResult<DashboardSummary> {
        self.summary_on(client_id, Utc::now().date_naive()).await
    }

    /// Summary as seen on `today`, which decides overdue and expired items.
    pub async fn summary_on(
        &self,
        client_id: &RecordId,
        today: NaiveDate,
    ) -> DomainResult<DashboardSummary> {
        let by_client = RecordQuery::new().eq("clientId", client_id);

        let (assessments, incidents, risks, poams, controls, systems) = futures::try_join!(
            self.assessments.list(&by_client),
            self.incidents.list(&by_client),
            self.risks.list(&by_client),
            self.poams.list(&by_client),
            self.controls.all(),
            self.systems.list(&by_client),
        )?;
        debug!(
            client_id = %client_id,
            assessments = assessments.len(),
            incidents = incidents.len(),
            risks = risks.len(),
            poams = poams.len(),
            controls = controls.len(),
            systems = systems.len(),
            "dashboard records loaded"
        );

        Ok(build_summary(
            client_id.clone(),
            today,
            &assessments,
            &incidents,
            &risks,
            &poams,
            &controls,
            &systems,
        ))
    }
}

#[allow(clippy::too_many_arguments)]
fn build_summary(
    client_id: RecordId,
    today: NaiveDate,
    assessments: &[Assessment],
    incidents: &[Incident],
    risks: &[Risk],
    poams: &[PoamItem],
    controls: &[Control],
    systems: &[System],
) -> DashboardSummary {
    let latest = |kind: AssessmentKind| {
        assessments
            .iter()
            .filter(|a| a.kind == kind)
            .max_by_key(|a| a.date)
    };
    let basic = latest(AssessmentKind::Basic);
    let advanced = latest(AssessmentKind::Advanced);

    let mut open_findings = BTreeMap::new();
    for finding in basic
        .into_iter()
        .chain(advanced)
        .flat_map(|a| &a.generated_findings)
        .filter(|f| f.status == FindingStatus::Open)
    {
        *open_findings.entry(finding.severity).or_insert(0) += 1;
    }

    let mut systems_by_status = BTreeMap::new();
    for system in systems {
        *systems_by_status
            .entry(system.ato_status.to_string())
            .or_insert(0) += 1;
    }

    let active_risks = risks.iter().filter(|r| r.status.is_active());

    DashboardSummary {
        client_id,
        as_of: today,
        basic_score: basic.map(|a| a.score),
        advanced_score: advanced.map(|a| a.score),
        assessments: assessments.len(),
        open_findings,
        open_incidents: incidents.iter().filter(|i| !i.status.is_closed()).count(),
        open_risks: active_risks.clone().count(),
        high_risks: active_risks.filter(|r| r.rating() >= HIGH_RISK_RATING).count(),
        open_poams: poams.iter().filter(|p| !p.status.is_done()).count(),
        overdue_poams: poams.iter().filter(|p| p.is_overdue(today)).count(),
        compliance: ComplianceSummary::from_controls(controls),
        systems_by_status,
        expired_atos: systems
            .iter()
            .filter(|s| s.ato_status == AtoStatus::Authorized && s.is_ato_expired(today))
            .count(),
    }
}
