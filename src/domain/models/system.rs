//! Information systems and their Authorization to Operate (ATO) state.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::RecordId;
use crate::domain::ports::Resource;

/// Length of a granted authorization.
pub const AUTHORIZATION_TERM_MONTHS: u32 = 36;

/// FIPS 199 security categorization.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Categorization {
    Low,
    #[default]
    Moderate,
    High,
}

impl_labels!(Categorization {
    Low => "low",
    Moderate => "moderate",
    High => "high",
});

/// ATO workflow status, following the RMF steps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AtoStatus {
    #[default]
    NotStarted,
    Categorize,
    Select,
    Implement,
    Assess,
    Authorize,
    Authorized,
    Denied,
}

impl_labels!(AtoStatus {
    NotStarted => "not_started",
    Categorize => "categorize",
    Select => "select",
    Implement => "implement",
    Assess => "assess",
    Authorize => "authorize",
    Authorized => "authorized",
    Denied => "denied",
});

impl AtoStatus {
    /// The following RMF step. `Authorize` only leaves through an explicit
    /// authorization decision, and the decisions themselves are final.
    pub const fn next(&self) -> Option<Self> {
        match self {
            Self::NotStarted => Some(Self::Categorize),
            Self::Categorize => Some(Self::Select),
            Self::Select => Some(Self::Implement),
            Self::Implement => Some(Self::Assess),
            Self::Assess => Some(Self::Authorize),
            Self::Authorize | Self::Authorized | Self::Denied => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct System {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub client_id: RecordId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub categorization: Categorization,
    #[serde(default)]
    pub ato_status: AtoStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorizing_official: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<NaiveDate>,
}

impl System {
    pub fn new(client_id: RecordId, name: impl Into<String>) -> Self {
        Self {
            id: None,
            client_id,
            name: name.into(),
            description: String::new(),
            categorization: Categorization::Moderate,
            ato_status: AtoStatus::NotStarted,
            authorizing_official: None,
            authorization_date: None,
            expiration_date: None,
        }
    }

    /// Record a positive authorization decision effective `on`.
    pub fn grant_authorization(&mut self, official: impl Into<String>, on: NaiveDate) {
        self.ato_status = AtoStatus::Authorized;
        self.authorizing_official = Some(official.into());
        self.authorization_date = Some(on);
        self.expiration_date = on.checked_add_months(Months::new(AUTHORIZATION_TERM_MONTHS));
    }

    /// Authorized but past the expiration date.
    pub fn is_ato_expired(&self, today: NaiveDate) -> bool {
        self.ato_status == AtoStatus::Authorized
            && self.expiration_date.is_some_and(|exp| exp < today)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("System name cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Resource for System {
    const COLLECTION: &'static str = "systems";

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }
}
