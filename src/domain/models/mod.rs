//! GRC domain models.
//!
//! Every record mirrors a JSON document held by the record API. Field names
//! serialize in camelCase and enum values in snake_case.

/// Implements `as_str`, a lenient `from_str`, `ALL` and `Display` for a
/// fieldless enum whose serde representation is the snake_case label.
macro_rules! impl_labels {
    ($ty:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl $ty {
            /// Every variant in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }

            /// Parse a label, accepting any case and `-` or space for `_`.
            #[allow(clippy::should_implement_trait)]
            pub fn from_str(s: &str) -> Option<Self> {
                match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
                    $($label => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub mod assessment;
pub mod config;
pub mod control;
pub mod finding;
pub mod incident;
pub mod organization;
pub mod poam;
pub mod question;
pub mod record_id;
pub mod risk;
pub mod system;

pub use assessment::{Assessment, AssessmentKind};
pub use config::{ApiConfig, Config, LoggingConfig, StoreBackend, StoreConfig};
pub use control::{Control, ImplementationStatus};
pub use finding::{Finding, FindingStatus, FindingTemplate, Severity};
pub use incident::{Incident, IncidentStatus};
pub use organization::{Department, Position, User};
pub use poam::{Milestone, PoamItem, PoamStatus};
pub use question::{Answer, AnswerMap, Question, QuestionKind, QuestionSet};
pub use record_id::RecordId;
pub use risk::{Risk, RiskLevel, RiskStatus};
pub use system::{AtoStatus, Categorization, System};
