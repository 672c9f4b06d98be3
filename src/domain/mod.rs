//! Domain layer for the GRC dashboard
//!
//! Records, question definitions and the storage port. Nothing here performs
//! I/O.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
