//! Infrastructure layer module
//!
//! Adapters satisfying the domain ports plus process-wide setup:
//! - Record API client (reqwest)
//! - JSON database file store
//! - Configuration management (figment)
//! - Logging infrastructure (tracing)

pub mod api;
pub mod config;
pub mod logging;
pub mod setup;
pub mod store;
