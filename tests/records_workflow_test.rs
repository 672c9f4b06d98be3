//! Incident, POA&M, control, system, organization and report workflows
//! against a file store

mod common;

use chrono::{Duration, NaiveDate, Utc};
use serde_json::json;
use std::sync::Arc;

use grcboard::domain::errors::DomainError;
use grcboard::domain::models::{
    AssessmentKind, AtoStatus, Department, ImplementationStatus, Incident, IncidentStatus,
    Milestone, PoamItem, PoamStatus, Position, RecordId, Risk, RiskLevel, RiskStatus, Severity,
    System,
};
use grcboard::domain::ports::RecordStore;
use grcboard::services::{
    AssessmentService, ControlFilter, ControlService, IncidentFilter, IncidentService,
    OrganizationService, PoamService, ReportService, RiskService, SystemService,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn client() -> RecordId {
    RecordId::from(1u64)
}

async fn seed_controls(store: &Arc<dyn RecordStore>) {
    for (id, status) in [
        ("AC-2", "implemented"),
        ("AC-10", "planned"),
        ("AC-2(1)", "implemented"),
        ("AU-6", "not_applicable"),
        ("AU-2", "not_implemented"),
    ] {
        store
            .create(
                "controls",
                json!({"id": id, "title": format!("Control {id}"), "implementationStatus": status}),
            )
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_incident_resolution_date_is_set_once() {
    let (_dir, store) = common::file_store().await;
    let service = IncidentService::new(store);

    let incident = service
        .report(Incident::new(client(), "Phishing campaign", Severity::High))
        .await
        .unwrap();
    let id = incident.id.clone().unwrap();
    assert_eq!(incident.status, IncidentStatus::Open);
    assert!(incident.resolved_date.is_none());

    let investigating = service
        .update_status(&id, IncidentStatus::Investigating)
        .await
        .unwrap();
    assert!(investigating.resolved_date.is_none());

    let resolved = service.update_status(&id, IncidentStatus::Resolved).await.unwrap();
    let resolved_at = resolved.resolved_date.expect("resolution date stamped");

    let closed = service.update_status(&id, IncidentStatus::Closed).await.unwrap();
    assert_eq!(closed.resolved_date, Some(resolved_at));
}

#[tokio::test]
async fn test_incident_validation_and_filters() {
    let (_dir, store) = common::file_store().await;
    let service = IncidentService::new(store);

    let err = service
        .report(Incident::new(client(), "  ", Severity::Low))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::ValidationFailed(_)));

    service
        .report(Incident::new(client(), "Lost badge", Severity::Low))
        .await
        .unwrap();
    service
        .report(Incident::new(client(), "Ransomware", Severity::Critical))
        .await
        .unwrap();

    let critical = service
        .list(&IncidentFilter {
            severity: Some(Severity::Critical),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(critical.len(), 1);
    assert_eq!(critical[0].title, "Ransomware");
}

#[tokio::test]
async fn test_risks_sorted_by_rating() {
    let (_dir, store) = common::file_store().await;
    let service = RiskService::new(store);

    let mut low = Risk::new(client(), "Tailgating");
    low.likelihood = RiskLevel::Low;
    low.impact = RiskLevel::Low;
    let mut high = Risk::new(client(), "Unpatched VPN");
    high.likelihood = RiskLevel::High;
    high.impact = RiskLevel::High;

    service.create(low).await.unwrap();
    let high = service.create(high).await.unwrap();

    let risks = service.list(Some(&client()), None).await.unwrap();
    assert_eq!(risks[0].title, "Unpatched VPN");
    assert_eq!(risks[0].rating(), 9);

    service
        .update_status(high.id.as_ref().unwrap(), RiskStatus::Mitigating)
        .await
        .unwrap();
    let mitigating = service
        .list(Some(&client()), Some(RiskStatus::Mitigating))
        .await
        .unwrap();
    assert_eq!(mitigating.len(), 1);
}

#[tokio::test]
async fn test_poam_milestones_and_overdue() {
    let (_dir, store) = common::file_store().await;
    let service = PoamService::new(store);

    let late = service
        .create(
            PoamItem::new(client(), "No audit log review", Severity::Medium)
                .with_scheduled_completion(Some(date(2026, 1, 31))),
        )
        .await
        .unwrap();
    service
        .create(
            PoamItem::new(client(), "Weak passwords", Severity::High)
                .with_scheduled_completion(Some(date(2026, 12, 31))),
        )
        .await
        .unwrap();
    service
        .create(PoamItem::new(client(), "Unscheduled", Severity::Low))
        .await
        .unwrap();

    let listed = service.list(Some(&client()), None).await.unwrap();
    let weaknesses: Vec<_> = listed.iter().map(|p| p.weakness.as_str()).collect();
    assert_eq!(weaknesses, vec!["No audit log review", "Weak passwords", "Unscheduled"]);

    let today = date(2026, 6, 1);
    let overdue = service.overdue(Some(&client()), today).await.unwrap();
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0].id, late.id);

    let id = late.id.clone().unwrap();
    let with_milestone = service
        .add_milestone(
            &id,
            Milestone {
                description: "Enable central log review".to_string(),
                due_date: date(2026, 7, 1),
                completed: false,
            },
        )
        .await
        .unwrap();
    assert_eq!(with_milestone.milestones.len(), 1);

    let done = service.complete_milestone(&id, 0).await.unwrap();
    assert!(done.milestones[0].completed);

    let err = service.complete_milestone(&id, 3).await.unwrap_err();
    assert!(matches!(err, DomainError::ValidationFailed(_)));

    service.update_status(&id, PoamStatus::Completed).await.unwrap();
    assert!(service.overdue(Some(&client()), today).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_controls_catalog_order_and_compliance() {
    let (_dir, store) = common::file_store().await;
    seed_controls(&store).await;
    let service = ControlService::new(store);

    let controls = service.list(&ControlFilter::default()).await.unwrap();
    let ids: Vec<_> = controls
        .iter()
        .map(|c| c.id.as_ref().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["AC-2", "AC-2(1)", "AC-10", "AU-2", "AU-6"]);

    let summary = service.compliance(&ControlFilter::default()).await.unwrap();
    assert_eq!(summary.total, 5);
    assert_eq!(summary.not_applicable, 1);
    // 2 implemented of 4 applicable
    assert_eq!(summary.percentage, 50);

    service
        .update_status(&RecordId::from("AU-2"), ImplementationStatus::Implemented)
        .await
        .unwrap();
    let audit = service
        .compliance(&ControlFilter {
            family: Some("au".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(audit.total, 2);
    assert_eq!(audit.percentage, 100);
}

#[tokio::test]
async fn test_system_ato_workflow() {
    let (_dir, store) = common::file_store().await;
    let service = SystemService::new(store);

    let system = service.create(System::new(client(), "Payroll")).await.unwrap();
    let id = system.id.clone().unwrap();

    let err = service.authorize(&id, "J. Smith", date(2026, 1, 1)).await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidTransition { .. }));

    let mut status = system.ato_status;
    while status != AtoStatus::Authorize {
        status = service.advance(&id).await.unwrap().ato_status;
    }
    let err = service.advance(&id).await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidTransition { .. }));

    let err = service.authorize(&id, " ", date(2023, 1, 1)).await.unwrap_err();
    assert!(matches!(err, DomainError::ValidationFailed(_)));

    let authorized = service.authorize(&id, "J. Smith", date(2023, 1, 1)).await.unwrap();
    assert_eq!(authorized.ato_status, AtoStatus::Authorized);
    assert_eq!(authorized.expiration_date, Some(date(2026, 1, 1)));

    let expired = service.expired(Some(&client()), date(2026, 6, 1)).await.unwrap();
    assert_eq!(expired.len(), 1);
    assert!(service.expired(Some(&client()), date(2025, 6, 1)).await.unwrap().is_empty());

    let err = service.deny(&id).await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidTransition { .. }));
}

#[tokio::test]
async fn test_department_with_positions_cannot_be_deleted() {
    let (_dir, store) = common::file_store().await;
    let service = OrganizationService::new(store);

    let department = service
        .create_department(Department {
            id: None,
            client_id: Some(client()),
            name: "Security".to_string(),
            description: String::new(),
            manager: None,
        })
        .await
        .unwrap();
    let department_id = department.id.clone().unwrap();

    let renamed = service
        .update_department(Department {
            name: "Information Security".to_string(),
            ..department
        })
        .await
        .unwrap();
    assert_eq!(renamed.id.as_ref(), Some(&department_id));
    assert_eq!(
        service.get_department(&department_id).await.unwrap().unwrap().name,
        "Information Security"
    );

    let position = service
        .create_position(Position {
            id: None,
            department_id: department_id.clone(),
            title: "ISSO".to_string(),
            description: String::new(),
            security_role: Some("ISSO".to_string()),
        })
        .await
        .unwrap();

    let err = service.delete_department(&department_id).await.unwrap_err();
    assert!(matches!(err, DomainError::ValidationFailed(_)));

    service.delete_position(position.id.as_ref().unwrap()).await.unwrap();
    service.delete_department(&department_id).await.unwrap();
    assert!(service.departments(Some(&client())).await.unwrap().is_empty());

    let orphan = service
        .create_position(Position {
            id: None,
            department_id: RecordId::from("99"),
            title: "Analyst".to_string(),
            description: String::new(),
            security_role: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(orphan, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn test_dashboard_summary_counts() {
    let (_dir, store) = common::file_store().await;
    seed_controls(&store).await;

    AssessmentService::new(store.clone())
        .submit(
            client(),
            AssessmentKind::Basic,
            common::basic_answers(&["mfa_enabled", "security_training"]),
        )
        .await
        .unwrap();

    let incidents = IncidentService::new(store.clone());
    incidents
        .report(Incident::new(client(), "Phishing", Severity::High))
        .await
        .unwrap();
    let closed = incidents
        .report(Incident::new(client(), "Lost laptop", Severity::Low))
        .await
        .unwrap();
    incidents
        .update_status(closed.id.as_ref().unwrap(), IncidentStatus::Closed)
        .await
        .unwrap();
    incidents
        .report(Incident::new(RecordId::from(2u64), "Other client", Severity::Low))
        .await
        .unwrap();

    let mut severe = Risk::new(client(), "Unpatched VPN");
    severe.likelihood = RiskLevel::High;
    severe.impact = RiskLevel::Medium;
    RiskService::new(store.clone()).create(severe).await.unwrap();

    let today = Utc::now().date_naive();
    PoamService::new(store.clone())
        .create(
            PoamItem::new(client(), "Overdue item", Severity::Medium)
                .with_scheduled_completion(Some(today - Duration::days(10))),
        )
        .await
        .unwrap();

    SystemService::new(store.clone())
        .create(System::new(client(), "Payroll"))
        .await
        .unwrap();

    let summary = ReportService::new(store)
        .summary_on(&client(), today)
        .await
        .unwrap();

    assert_eq!(summary.basic_score, Some(75));
    assert_eq!(summary.advanced_score, None);
    assert_eq!(summary.assessments, 1);
    assert_eq!(summary.open_findings.get(&Severity::High), Some(&1));
    assert_eq!(summary.open_findings.get(&Severity::Medium), Some(&1));
    assert_eq!(summary.open_incidents, 1);
    assert_eq!(summary.open_risks, 1);
    assert_eq!(summary.high_risks, 1);
    assert_eq!(summary.open_poams, 1);
    assert_eq!(summary.overdue_poams, 1);
    assert_eq!(summary.compliance.percentage, 50);
    assert_eq!(summary.systems_by_status.get("not_started"), Some(&1));
    assert_eq!(summary.expired_atos, 0);
}
