//! Assessment submission, history and finding promotion against a file store

mod common;

use chrono::NaiveDate;

use grcboard::domain::errors::DomainError;
use grcboard::domain::models::{
    Answer, AssessmentKind, FindingStatus, PoamStatus, RecordId, RiskLevel, Severity,
};
use grcboard::services::{
    AssessmentService, FindingFilter, FindingService, PoamService, RiskService,
};

#[tokio::test]
async fn test_submit_stores_scored_assessment() {
    let (_dir, store) = common::file_store().await;
    let service = AssessmentService::new(store);
    let client = RecordId::from(1u64);

    let assessment = service
        .submit(
            client.clone(),
            AssessmentKind::Basic,
            common::basic_answers(&["mfa_enabled", "data_backups"]),
        )
        .await
        .unwrap();

    assert!(assessment.id.is_some());
    assert_eq!(assessment.score, 75);
    assert_eq!(assessment.generated_findings.len(), 2);
    assert!(assessment
        .generated_findings
        .iter()
        .all(|f| f.status == FindingStatus::Open));

    let stored = service.get(assessment.id.as_ref().unwrap()).await.unwrap();
    assert_eq!(stored, Some(assessment));
}

#[tokio::test]
async fn test_submit_rejects_incomplete_answers() {
    let (_dir, store) = common::file_store().await;
    let service = AssessmentService::new(store);

    let mut answers = common::basic_answers(&[]);
    answers.remove("mfa_enabled");
    answers.insert("data_backups".to_string(), Answer::text("maybe"));

    let err = service
        .submit(RecordId::from(1u64), AssessmentKind::Basic, answers)
        .await
        .unwrap_err();

    match err {
        DomainError::IncompleteAssessment(missing) => {
            assert_eq!(missing, vec!["mfa_enabled".to_string(), "data_backups".to_string()]);
        }
        other => panic!("expected IncompleteAssessment, got {other:?}"),
    }
    assert!(service.history(&RecordId::from(1u64)).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_submit_drops_unknown_answers() {
    let (_dir, store) = common::file_store().await;
    let service = AssessmentService::new(store);

    let mut answers = common::basic_answers(&[]);
    answers.insert("favourite_colour".to_string(), Answer::text("blue"));

    let assessment = service
        .submit(RecordId::from(1u64), AssessmentKind::Basic, answers)
        .await
        .unwrap();

    assert!(!assessment.answers.contains_key("favourite_colour"));
    assert_eq!(assessment.score, 100);
}

#[tokio::test]
async fn test_submit_accepts_capitalized_yes_no() {
    let (_dir, store) = common::file_store().await;
    let service = AssessmentService::new(store);

    let mut answers = common::basic_answers(&[]);
    answers.insert("mfa_enabled".to_string(), Answer::text("Yes"));
    answers.insert("data_backups".to_string(), Answer::text("NO "));

    let assessment = service
        .submit(RecordId::from(1u64), AssessmentKind::Basic, answers)
        .await
        .unwrap();

    assert_eq!(assessment.answers["mfa_enabled"], Answer::text("yes"));
    assert_eq!(assessment.answers["data_backups"], Answer::text("no"));
    assert_eq!(assessment.score, 88);
    assert_eq!(assessment.generated_findings.len(), 1);
}

#[tokio::test]
async fn test_history_is_per_client_and_newest_first() {
    let (_dir, store) = common::file_store().await;
    let service = AssessmentService::new(store);
    let client = RecordId::from(1u64);

    service
        .submit(client.clone(), AssessmentKind::Basic, common::basic_answers(&["mfa_enabled"]))
        .await
        .unwrap();
    let second = service
        .submit(client.clone(), AssessmentKind::Advanced, common::strong_advanced_answers())
        .await
        .unwrap();
    service
        .submit(RecordId::from(2u64), AssessmentKind::Basic, common::basic_answers(&[]))
        .await
        .unwrap();

    let history = service.history(&client).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].id, second.id);

    let latest_basic = service
        .latest(&client, Some(AssessmentKind::Basic))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest_basic.kind, AssessmentKind::Basic);
}

#[tokio::test]
async fn test_findings_sorted_by_severity_and_filtered() {
    let (_dir, store) = common::file_store().await;
    let service = AssessmentService::new(store);
    let client = RecordId::from(1u64);

    // mfa_enabled is high, security_training is medium
    service
        .submit(
            client.clone(),
            AssessmentKind::Basic,
            common::basic_answers(&["security_training", "mfa_enabled"]),
        )
        .await
        .unwrap();

    let all = service.findings(&client, &FindingFilter::default()).await.unwrap();
    assert_eq!(all.len(), 2);
    assert!(all[0].finding.severity >= all[1].finding.severity);

    let medium = service
        .findings(
            &client,
            &FindingFilter {
                severity: Some(Severity::Medium),
                status: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(medium.len(), 1);
    assert_eq!(medium[0].finding.source_question, "security_training");
}

#[tokio::test]
async fn test_promote_to_risk_copies_finding_once() {
    let (_dir, store) = common::file_store().await;
    let assessments = AssessmentService::new(store.clone());
    let findings = FindingService::new(store.clone());
    let risks = RiskService::new(store);

    let assessment = assessments
        .submit(RecordId::from(1u64), AssessmentKind::Basic, common::basic_answers(&["mfa_enabled"]))
        .await
        .unwrap();
    let assessment_id = assessment.id.clone().unwrap();
    let finding = &assessment.generated_findings[0];

    let risk = findings
        .promote_to_risk(&assessment_id, finding.id.as_str())
        .await
        .unwrap();
    assert_eq!(risk.title, finding.title);
    assert_eq!(risk.impact, RiskLevel::High);
    assert_eq!(risk.likelihood, RiskLevel::Medium);
    assert_eq!(risk.source_finding.as_ref(), Some(&finding.id));

    let err = findings
        .promote_to_risk(&assessment_id, finding.id.as_str())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::AlreadyPromoted { .. }));

    assert_eq!(risks.list(None, None).await.unwrap().len(), 1);

    // The assessment itself is untouched
    let reloaded = assessments.get(&assessment_id).await.unwrap().unwrap();
    assert_eq!(reloaded, assessment);
}

#[tokio::test]
async fn test_promote_to_poam_with_due_date() {
    let (_dir, store) = common::file_store().await;
    let assessments = AssessmentService::new(store.clone());
    let findings = FindingService::new(store.clone());
    let poams = PoamService::new(store);

    let assessment = assessments
        .submit(
            RecordId::from(1u64),
            AssessmentKind::Basic,
            common::basic_answers(&["data_backups"]),
        )
        .await
        .unwrap();
    let finding = &assessment.generated_findings[0];
    let due = NaiveDate::from_ymd_opt(2026, 12, 31).unwrap();

    let item = findings
        .promote_to_poam(assessment.id.as_ref().unwrap(), finding.id.as_str(), Some(due))
        .await
        .unwrap();

    assert_eq!(item.weakness, finding.title);
    assert_eq!(item.severity, finding.severity);
    assert_eq!(item.status, PoamStatus::Open);
    assert_eq!(item.scheduled_completion, Some(due));
    assert!(item.description.contains(&finding.recommendation));
    assert_eq!(poams.list(None, None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_promote_unknown_finding_is_not_found() {
    let (_dir, store) = common::file_store().await;
    let assessments = AssessmentService::new(store.clone());
    let findings = FindingService::new(store);

    let assessment = assessments
        .submit(RecordId::from(1u64), AssessmentKind::Basic, common::basic_answers(&[]))
        .await
        .unwrap();

    let err = findings
        .promote_to_risk(assessment.id.as_ref().unwrap(), "no-such-finding")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));

    let err = findings
        .promote_to_risk(&RecordId::from("404"), "no-such-finding")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}
