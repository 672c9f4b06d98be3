//! Record identifiers.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of a stored record.
///
/// The record API may hand back integer ids (json-server assigns them
/// sequentially) or strings such as `"AC-2"`; both are normalized to a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Fresh random identifier for records minted client-side.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value when the id is an integer, as json-server assigns them.
    pub fn as_number(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Signed(i64),
            Unsigned(u64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Self(s),
            Raw::Signed(n) => Self(n.to_string()),
            Raw::Unsigned(n) => Self(n.to_string()),
        })
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<u64> for RecordId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_integer_and_string_ids() {
        let from_int: RecordId = serde_json::from_str("7").unwrap();
        let from_str: RecordId = serde_json::from_str("\"AC-2\"").unwrap();

        assert_eq!(from_int.as_str(), "7");
        assert_eq!(from_int.as_number(), Some(7));
        assert_eq!(from_str.as_str(), "AC-2");
        assert_eq!(from_str.as_number(), None);
    }

    #[test]
    fn test_serializes_as_string() {
        let id = RecordId::from(12_u64);
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"12\"");
    }
}
