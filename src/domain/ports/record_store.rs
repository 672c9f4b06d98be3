//! Record store port.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::errors::DomainResult;
use crate::domain::models::RecordId;

/// Equality filters applied to a collection listing, sent as query
/// parameters (`?clientId=1&status=open`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordQuery {
    pub filters: Vec<(String, String)>,
}

impl RecordQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field` to equal `value`.
    pub fn eq(mut self, field: impl Into<String>, value: impl ToString) -> Self {
        self.filters.push((field.into(), value.to_string()));
        self
    }

    /// Require `field` to equal `value` when a value is given.
    pub fn eq_opt(self, field: impl Into<String>, value: Option<impl ToString>) -> Self {
        match value {
            Some(v) => self.eq(field, v),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Whether a JSON document satisfies every filter. Scalars compare by
    /// their string form, so `1` matches `"1"`.
    pub fn matches(&self, document: &Value) -> bool {
        self.filters.iter().all(|(field, expected)| {
            match document.get(field) {
                Some(Value::String(s)) => s == expected,
                Some(Value::Number(n)) => n.to_string() == *expected,
                Some(Value::Bool(b)) => b.to_string() == *expected,
                _ => false,
            }
        })
    }
}

/// Collection CRUD over JSON documents.
///
/// Mirrors the json-server style record API: every collection is a flat list
/// of documents keyed by `id`.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// List documents of a collection matching the query
    async fn list(&self, collection: &str, query: &RecordQuery) -> DomainResult<Vec<Value>>;

    /// Get one document, `Ok(None)` when absent
    async fn get(&self, collection: &str, id: &RecordId) -> DomainResult<Option<Value>>;

    /// Insert a document; the store assigns an id when the body has none
    async fn create(&self, collection: &str, body: Value) -> DomainResult<Value>;

    /// Replace a document entirely
    async fn replace(&self, collection: &str, id: &RecordId, body: Value) -> DomainResult<Value>;

    /// Merge top-level fields into a document
    async fn patch(&self, collection: &str, id: &RecordId, changes: Value) -> DomainResult<Value>;

    /// Remove a document
    async fn delete(&self, collection: &str, id: &RecordId) -> DomainResult<()>;
}
