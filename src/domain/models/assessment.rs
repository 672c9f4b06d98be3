//! Assessment domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AnswerMap, Finding, RecordId};
use crate::domain::ports::Resource;

/// Which fixed question set an assessment answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentKind {
    Basic,
    Advanced,
}

impl_labels!(AssessmentKind {
    Basic => "basic",
    Advanced => "advanced",
});

/// A submitted assessment. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub client_id: RecordId,
    #[serde(rename = "type")]
    pub kind: AssessmentKind,
    pub date: DateTime<Utc>,
    pub answers: AnswerMap,
    pub score: u8,
    #[serde(default)]
    pub generated_findings: Vec<Finding>,
}

impl Assessment {
    pub fn find_finding(&self, finding_id: &str) -> Option<&Finding> {
        self.generated_findings
            .iter()
            .find(|f| f.id.as_str() == finding_id)
    }
}

impl Resource for Assessment {
    const COLLECTION: &'static str = "assessments";

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }
}
