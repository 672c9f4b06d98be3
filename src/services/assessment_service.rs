//! Assessment submission and history.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    AnswerMap, Assessment, AssessmentKind, Finding, FindingStatus, QuestionSet, RecordId, Severity,
};
use crate::domain::ports::{RecordQuery, RecordStore, Repository};
use crate::services::question_bank::question_set;
use crate::services::scoring::{evaluate, ScoreOutcome};

/// Filter criteria for listing generated findings.
#[derive(Debug, Clone, Default)]
pub struct FindingFilter {
    pub severity: Option<Severity>,
    pub status: Option<FindingStatus>,
}

/// A generated finding together with the assessment it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientFinding {
    pub assessment_id: Option<RecordId>,
    pub assessment_date: DateTime<Utc>,
    #[serde(flatten)]
    pub finding: Finding,
}

pub struct AssessmentService {
    assessments: Repository<Assessment>,
}

impl AssessmentService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            assessments: Repository::new(store),
        }
    }

    /// The fixed questions of an assessment kind.
    pub fn questions(kind: AssessmentKind) -> &'static QuestionSet {
        question_set(kind)
    }

    /// Score answers without storing anything. Fails when the answers do not
    /// pass the completeness gate.
    pub fn preview(kind: AssessmentKind, answers: &AnswerMap) -> DomainResult<ScoreOutcome> {
        let set = question_set(kind);
        let missing = set.missing_answers(answers);
        if !missing.is_empty() {
            return Err(DomainError::IncompleteAssessment(missing));
        }
        Ok(evaluate(set, answers))
    }

    /// Score a complete answer map and store the resulting assessment.
    pub async fn submit(
        &self,
        client_id: RecordId,
        kind: AssessmentKind,
        mut answers: AnswerMap,
    ) -> DomainResult<Assessment> {
        let set = question_set(kind);
        answers.retain(|id, _| {
            let known = set.get(id).is_some();
            if !known {
                warn!(question = %id, kind = %kind, "dropping answer to unknown question");
            }
            known
        });
        set.normalize(&mut answers);

        let outcome = Self::preview(kind, &answers)?;
        let assessment = Assessment {
            id: None,
            client_id,
            kind,
            date: Utc::now(),
            answers,
            score: outcome.score,
            generated_findings: outcome.findings,
        };

        let stored = self.assessments.create(&assessment).await?;
        info!(
            client_id = %stored.client_id,
            kind = %stored.kind,
            score = stored.score,
            findings = stored.generated_findings.len(),
            "assessment submitted"
        );
        Ok(stored)
    }

    pub async fn get(&self, id: &RecordId) -> DomainResult<Option<Assessment>> {
        self.assessments.get(id).await
    }

    /// A client's assessments, newest first.
    pub async fn history(&self, client_id: &RecordId) -> DomainResult<Vec<Assessment>> {
        let mut assessments = self
            .assessments
            .list(&RecordQuery::new().eq("clientId", client_id))
            .await?;
        assessments.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(assessments)
    }

    /// Most recent assessment of a client, optionally of one kind.
    pub async fn latest(
        &self,
        client_id: &RecordId,
        kind: Option<AssessmentKind>,
    ) -> DomainResult<Option<Assessment>> {
        Ok(self
            .history(client_id)
            .await?
            .into_iter()
            .find(|a| kind.is_none_or(|k| a.kind == k)))
    }

    /// Findings generated across a client's assessments, most severe first,
    /// newest first within a severity.
    pub async fn findings(
        &self,
        client_id: &RecordId,
        filter: &FindingFilter,
    ) -> DomainResult<Vec<ClientFinding>> {
        let history = self.history(client_id).await?;
        Ok(collect_findings(history, filter))
    }
}

/// Flatten and order the findings of a set of assessments.
pub fn collect_findings(assessments: Vec<Assessment>, filter: &FindingFilter) -> Vec<ClientFinding> {
    let mut findings: Vec<ClientFinding> = assessments
        .into_iter()
        .flat_map(|assessment| {
            let assessment_id = assessment.id.clone();
            let assessment_date = assessment.date;
            assessment
                .generated_findings
                .into_iter()
                .map(move |finding| ClientFinding {
                    assessment_id: assessment_id.clone(),
                    assessment_date,
                    finding,
                })
        })
        .filter(|cf| filter.severity.is_none_or(|s| cf.finding.severity == s))
        .filter(|cf| filter.status.is_none_or(|s| cf.finding.status == s))
        .collect();

    findings.sort_by(|a, b| {
        b.finding
            .severity
            .cmp(&a.finding.severity)
            .then_with(|| b.finding.created_date.cmp(&a.finding.created_date))
    });
    findings
}
