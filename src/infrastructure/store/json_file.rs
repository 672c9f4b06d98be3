//! Record store over a local JSON database file.
//!
//! The file uses the mock server's layout, `{ "<collection>": [records] }`,
//! so the same database can be served over HTTP or read directly.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::RecordId;
use crate::domain::ports::{RecordQuery, RecordStore};

type Database = Map<String, Value>;

pub struct JsonFileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles on the file
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the database file with empty collections if it does not exist.
    /// Returns whether a file was written.
    pub async fn initialize(&self, collections: &[&str]) -> DomainResult<bool> {
        let _guard = self.lock.lock().await;
        if tokio::fs::try_exists(&self.path).await.map_err(io_error)? {
            return Ok(false);
        }

        let db: Database = collections
            .iter()
            .map(|c| ((*c).to_string(), Value::Array(Vec::new())))
            .collect();
        self.write(&db).await?;
        Ok(true)
    }

    async fn read(&self) -> DomainResult<Database> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Database::new()),
            Ok(bytes) => match serde_json::from_slice(&bytes)? {
                Value::Object(db) => Ok(db),
                _ => Err(DomainError::Store(format!(
                    "{} is not a JSON object",
                    self.path.display()
                ))),
            },
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Database::new()),
            Err(err) => Err(io_error(err)),
        }
    }

    /// Write through a temporary sibling file and rename it into place.
    async fn write(&self, db: &Database) -> DomainResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
        }
        let bytes = serde_json::to_vec_pretty(db)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await.map_err(io_error)?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(io_error)?;
        Ok(())
    }

    /// Apply `change` to one collection and persist the database.
    async fn modify<R>(
        &self,
        collection: &str,
        change: impl FnOnce(&mut Vec<Value>) -> DomainResult<R>,
    ) -> DomainResult<R> {
        let _guard = self.lock.lock().await;
        let mut db = self.read().await?;
        let records = match db
            .entry(collection)
            .or_insert_with(|| Value::Array(Vec::new()))
        {
            Value::Array(records) => records,
            _ => return Err(not_a_collection(collection)),
        };

        let result = change(records)?;
        self.write(&db).await?;
        debug!(collection, path = %self.path.display(), "database file updated");
        Ok(result)
    }

    async fn snapshot(&self, collection: &str) -> DomainResult<Vec<Value>> {
        let _guard = self.lock.lock().await;
        match self.read().await?.remove(collection) {
            Some(Value::Array(records)) => Ok(records),
            Some(_) => Err(not_a_collection(collection)),
            None => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn list(&self, collection: &str, query: &RecordQuery) -> DomainResult<Vec<Value>> {
        let mut records = self.snapshot(collection).await?;
        records.retain(|r| query.matches(r));
        Ok(records)
    }

    async fn get(&self, collection: &str, id: &RecordId) -> DomainResult<Option<Value>> {
        let records = self.snapshot(collection).await?;
        Ok(records.into_iter().find(|r| has_id(r, id)))
    }

    async fn create(&self, collection: &str, mut body: Value) -> DomainResult<Value> {
        self.modify(collection, |records| {
            let object = as_object(&mut body, collection)?;
            let id = match object.get("id").and_then(id_of) {
                Some(id) => {
                    if records.iter().any(|r| has_id(r, &id)) {
                        return Err(DomainError::Store(format!(
                            "{collection} record {id} already exists"
                        )));
                    }
                    id
                }
                None => next_id(records),
            };
            object.insert("id".to_string(), id_value(&id));
            records.push(body.clone());
            Ok(body)
        })
        .await
    }

    async fn replace(&self, collection: &str, id: &RecordId, mut body: Value) -> DomainResult<Value> {
        self.modify(collection, |records| {
            let slot = records
                .iter_mut()
                .find(|r| has_id(r, id))
                .ok_or_else(|| DomainError::not_found(collection, id))?;
            as_object(&mut body, collection)?.insert("id".to_string(), id_value(id));
            slot.clone_from(&body);
            Ok(body)
        })
        .await
    }

    async fn patch(&self, collection: &str, id: &RecordId, changes: Value) -> DomainResult<Value> {
        let Value::Object(changes) = changes else {
            return Err(DomainError::ValidationFailed(
                "Patch body must be a JSON object".to_string(),
            ));
        };

        self.modify(collection, |records| {
            let slot = records
                .iter_mut()
                .find(|r| has_id(r, id))
                .ok_or_else(|| DomainError::not_found(collection, id))?;
            let object = as_object(slot, collection)?;
            for (field, value) in changes {
                if field != "id" {
                    object.insert(field, value);
                }
            }
            Ok(slot.clone())
        })
        .await
    }

    async fn delete(&self, collection: &str, id: &RecordId) -> DomainResult<()> {
        self.modify(collection, |records| {
            let before = records.len();
            records.retain(|r| !has_id(r, id));
            if records.len() == before {
                return Err(DomainError::not_found(collection, id));
            }
            Ok(())
        })
        .await
    }
}

fn id_of(value: &Value) -> Option<RecordId> {
    match value {
        Value::String(s) => Some(RecordId::from(s.as_str())),
        Value::Number(n) => Some(RecordId::new(n.to_string())),
        _ => None,
    }
}

fn has_id(record: &Value, id: &RecordId) -> bool {
    record.get("id").and_then(id_of).as_ref() == Some(id)
}

/// Integer ids stay numbers in the file, as the mock server writes them.
fn id_value(id: &RecordId) -> Value {
    id.as_number()
        .map_or_else(|| Value::String(id.to_string()), Value::from)
}

/// One past the largest integer id in the collection.
fn next_id(records: &[Value]) -> RecordId {
    let max = records
        .iter()
        .filter_map(|r| r.get("id").and_then(id_of))
        .filter_map(|id| id.as_number())
        .max()
        .unwrap_or(0);
    RecordId::from(max + 1)
}

fn as_object<'a>(value: &'a mut Value, collection: &str) -> DomainResult<&'a mut Map<String, Value>> {
    value.as_object_mut().ok_or_else(|| {
        DomainError::ValidationFailed(format!("{collection} records must be JSON objects"))
    })
}

fn not_a_collection(collection: &str) -> DomainError {
    DomainError::Store(format!("'{collection}' in the database file is not a list"))
}

#[allow(clippy::needless_pass_by_value)]
fn io_error(err: std::io::Error) -> DomainError {
    DomainError::Store(format!("Database file error: {err}"))
}
