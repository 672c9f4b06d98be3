//! Record store backends and selection from configuration.

pub mod json_file;

pub use json_file::JsonFileStore;

use anyhow::Result;
use std::sync::Arc;
use tracing::debug;

use super::api::RestClient;
use crate::domain::models::{
    Assessment, Config, Control, Department, Incident, PoamItem, Position, Risk, StoreBackend,
    System, User,
};
use crate::domain::ports::{RecordStore, Resource};

/// Every collection the dashboard reads or writes.
pub const COLLECTIONS: &[&str] = &[
    Assessment::COLLECTION,
    Incident::COLLECTION,
    Risk::COLLECTION,
    PoamItem::COLLECTION,
    Control::COLLECTION,
    System::COLLECTION,
    Department::COLLECTION,
    Position::COLLECTION,
    User::COLLECTION,
];

/// Build the record store selected by `config.store.backend`.
pub fn open_store(config: &Config) -> Result<Arc<dyn RecordStore>> {
    match config.store.backend {
        StoreBackend::Api => {
            debug!(base_url = %config.api.base_url, "using record API");
            Ok(Arc::new(RestClient::from_config(&config.api)?))
        }
        StoreBackend::File => {
            debug!(path = %config.store.path, "using JSON database file");
            Ok(Arc::new(JsonFileStore::new(&config.store.path)))
        }
    }
}
