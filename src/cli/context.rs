//! Shared state for command handlers.

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use std::sync::Arc;

use crate::domain::models::{Config, RecordId};
use crate::domain::ports::RecordStore;
use crate::infrastructure::store::open_store;

/// Loaded configuration and the record store it selects.
pub struct AppContext {
    pub config: Config,
    pub store: Arc<dyn RecordStore>,
}

impl AppContext {
    pub fn from_config(config: Config) -> Result<Self> {
        let store = open_store(&config).context("Failed to open record store")?;
        Ok(Self { config, store })
    }

    /// The explicit client, else `default_client_id`.
    pub fn client_filter(&self, explicit: Option<String>) -> Option<RecordId> {
        explicit
            .map(RecordId::from)
            .or_else(|| self.config.default_client_id.clone())
    }

    /// Like [`client_filter`](Self::client_filter) but a client is required.
    pub fn client_id(&self, explicit: Option<String>) -> Result<RecordId> {
        self.client_filter(explicit).ok_or_else(|| {
            anyhow!("No client given. Pass --client or set default_client_id in .grcboard/config.yaml")
        })
    }
}

/// Parse a label with an enum's lenient parser, listing the accepted values
/// on failure.
pub fn parse_label<T: Copy + std::fmt::Display>(
    what: &str,
    value: &str,
    all: &[T],
    parse: fn(&str) -> Option<T>,
) -> Result<T> {
    parse(value).ok_or_else(|| {
        let accepted: Vec<String> = all.iter().map(ToString::to_string).collect();
        anyhow!("Invalid {what}: {value}. Must be one of: {}", accepted.join(", "))
    })
}

/// Optional variant of [`parse_label`].
pub fn parse_label_opt<T: Copy + std::fmt::Display>(
    what: &str,
    value: Option<&str>,
    all: &[T],
    parse: fn(&str) -> Option<T>,
) -> Result<Option<T>> {
    value.map(|v| parse_label(what, v, all, parse)).transpose()
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date: {value}. Expected YYYY-MM-DD"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Severity;

    #[test]
    fn test_parse_label_lists_accepted_values() {
        assert_eq!(
            parse_label("severity", "High", Severity::ALL, Severity::from_str).unwrap(),
            Severity::High
        );

        let err = parse_label("severity", "urgent", Severity::ALL, Severity::from_str).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid severity: urgent. Must be one of: low, medium, high, critical"
        );
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2026-03-31").unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 31).unwrap()
        );
        assert!(parse_date("31/03/2026").is_err());
    }
}
