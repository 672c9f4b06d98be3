//! Port trait definitions (Hexagonal Architecture)
//!
//! - RecordStore: untyped collection CRUD implemented by the REST client and
//!   the JSON file store
//! - Resource / Repository: typed access to one collection on top of a store

pub mod record_store;
pub mod repository;

pub use record_store::{RecordQuery, RecordStore};
pub use repository::{Repository, Resource};
