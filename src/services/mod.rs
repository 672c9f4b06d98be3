pub mod assessment_service;
pub mod control_service;
pub mod finding_service;
pub mod incident_service;
pub mod organization_service;
pub mod poam_service;
pub mod question_bank;
pub mod report_service;
pub mod risk_service;
pub mod scoring;
pub mod system_service;

pub use assessment_service::{AssessmentService, ClientFinding, FindingFilter};
pub use control_service::{ComplianceSummary, ControlFilter, ControlService};
pub use finding_service::FindingService;
pub use incident_service::{IncidentFilter, IncidentService};
pub use organization_service::OrganizationService;
pub use poam_service::PoamService;
pub use question_bank::question_set;
pub use report_service::{DashboardSummary, ReportService};
pub use risk_service::RiskService;
pub use scoring::{evaluate, evaluate_at, ScoreOutcome};
pub use system_service::SystemService;
