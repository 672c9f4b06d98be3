//! CLI command implementations.

pub mod assess;
pub mod control;
pub mod incident;
pub mod init;
pub mod org;
pub mod poam;
pub mod report;
pub mod risk;
pub mod system;
