//! Typed access to a single collection.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;

use super::{RecordQuery, RecordStore};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::RecordId;

/// A record type stored in a named collection.
pub trait Resource: Serialize + DeserializeOwned + Send + Sync {
    /// Collection path segment, e.g. `"assessments"`.
    const COLLECTION: &'static str;

    /// Id assigned by the store, `None` before creation.
    fn id(&self) -> Option<&RecordId>;
}

/// Typed wrapper translating between records and store documents.
pub struct Repository<T> {
    store: Arc<dyn RecordStore>,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _record: PhantomData,
        }
    }
}

impl<T: Resource> Repository<T> {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }

    pub async fn list(&self, query: &RecordQuery) -> DomainResult<Vec<T>> {
        self.store
            .list(T::COLLECTION, query)
            .await?
            .into_iter()
            .map(decode::<T>)
            .collect()
    }

    pub async fn all(&self) -> DomainResult<Vec<T>> {
        self.list(&RecordQuery::new()).await
    }

    pub async fn get(&self, id: &RecordId) -> DomainResult<Option<T>> {
        self.store
            .get(T::COLLECTION, id)
            .await?
            .map(decode::<T>)
            .transpose()
    }

    /// Like [`get`](Self::get) but a missing record is an error.
    pub async fn require(&self, id: &RecordId) -> DomainResult<T> {
        self.get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(T::COLLECTION, id))
    }

    pub async fn create(&self, record: &T) -> DomainResult<T> {
        let body = serde_json::to_value(record)?;
        decode(self.store.create(T::COLLECTION, body).await?)
    }

    pub async fn update(&self, record: &T) -> DomainResult<T> {
        let id = record.id().ok_or_else(|| {
            DomainError::ValidationFailed(format!("Cannot update {} record without id", T::COLLECTION))
        })?;
        let body = serde_json::to_value(record)?;
        decode(self.store.replace(T::COLLECTION, id, body).await?)
    }

    pub async fn patch(&self, id: &RecordId, changes: Value) -> DomainResult<T> {
        decode(self.store.patch(T::COLLECTION, id, changes).await?)
    }

    pub async fn delete(&self, id: &RecordId) -> DomainResult<()> {
        self.store.delete(T::COLLECTION, id).await
    }
}

fn decode<T: DeserializeOwned>(document: Value) -> DomainResult<T> {
    serde_json::from_value(document).map_err(DomainError::from)
}
