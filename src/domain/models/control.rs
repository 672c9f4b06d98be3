//! NIST SP 800-53 control catalog entries.

use serde::{Deserialize, Serialize};

use super::RecordId;
use crate::domain::ports::Resource;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImplementationStatus {
    #[default]
    NotImplemented,
    Planned,
    PartiallyImplemented,
    Implemented,
    NotApplicable,
}

impl_labels!(ImplementationStatus {
    NotImplemented => "not_implemented",
    Planned => "planned",
    PartiallyImplemented => "partially_implemented",
    Implemented => "implemented",
    NotApplicable => "not_applicable",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Control {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub family: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub implementation_status: ImplementationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible_role: Option<String>,
}

impl Control {
    /// Family code of this control, from the `family` field or the id prefix.
    pub fn family_code(&self) -> String {
        if !self.family.is_empty() {
            return self.family.to_uppercase();
        }
        self.id
            .as_ref()
            .map(|id| family_of(id.as_str()))
            .unwrap_or_default()
    }

    /// Catalog order: family, then control number, then enhancement.
    pub fn sort_key(&self) -> (String, u32, u32) {
        self.id
            .as_ref()
            .map_or_else(|| (String::new(), 0, 0), |id| catalog_key(id.as_str()))
    }
}

impl Resource for Control {
    const COLLECTION: &'static str = "controls";

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }
}

/// `"AC-2(4)"` -> `"AC"`.
pub fn family_of(control_id: &str) -> String {
    control_id
        .split('-')
        .next()
        .unwrap_or_default()
        .trim()
        .to_uppercase()
}

/// `"AC-2(4)"` -> `("AC", 2, 4)`, `"AC-2"` -> `("AC", 2, 0)`.
pub fn catalog_key(control_id: &str) -> (String, u32, u32) {
    let family = family_of(control_id);
    let rest = control_id.split_once('-').map_or("", |(_, r)| r);
    let (number, enhancement) = match rest.split_once('(') {
        Some((n, e)) => (n, e.trim_end_matches(')')),
        None => (rest, ""),
    };
    (
        family,
        number.trim().parse().unwrap_or(0),
        enhancement.trim().parse().unwrap_or(0),
    )
}
