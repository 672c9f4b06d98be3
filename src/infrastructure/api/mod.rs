//! HTTP adapter for the json-server style record API.

pub mod client;
pub mod errors;

pub use client::RestClient;
pub use errors::ApiError;
