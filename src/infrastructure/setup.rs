//! Project initialization
//!
//! Handles `grcboard init`:
//! - Configuration directory creation
//! - Default config file creation
//! - Local JSON database seeding for the file backend

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::config::CONFIG_DIR;
use super::store::{JsonFileStore, COLLECTIONS};
use crate::domain::models::StoreBackend;

/// Default configuration template content
const DEFAULT_CONFIG_TEMPLATE: &str = r#"# grcboard configuration
# Override settings by editing this file, adding .grcboard/local.yaml, or
# setting environment variables with the GRCBOARD_ prefix
#
# Example environment variables:
#   export GRCBOARD_API__BASE_URL=http://localhost:3001
#   export GRCBOARD_STORE__BACKEND=file
#   export GRCBOARD_LOGGING__LEVEL=debug
#   export GRCBOARD_DEFAULT_CLIENT_ID=1

# Client used when a command omits --client
# default_client_id: 1

# Record API (json-server compatible)
api:
  base_url: "http://localhost:3001"
  timeout_secs: 30

# Where records live: "api" talks to the record API, "file" reads and writes
# the JSON database below directly
store:
  backend: "{backend}"
  path: ".grcboard/db.json"

# Logging configuration
logging:
  # Log level: trace, debug, info, warn, error
  level: "warn"

  # Log format on stderr: json, pretty
  format: "pretty"

  # Directory for rotated JSON log files (disabled when unset)
  # log_dir: ".grcboard/logs"

  # Rotation policy: daily, hourly, never
  rotation: "daily"
"#;

/// Setup paths and directories
pub struct SetupPaths {
    pub config_dir: PathBuf,
    pub config_file: PathBuf,
    pub database_file: PathBuf,
}

impl SetupPaths {
    /// Setup paths under `root`
    pub fn new(root: &Path) -> Self {
        let config_dir = root.join(CONFIG_DIR);
        Self {
            config_file: config_dir.join("config.yaml"),
            database_file: config_dir.join("db.json"),
            config_dir,
        }
    }

    /// Check if grcboard is already initialized
    pub fn is_initialized(&self) -> bool {
        self.config_file.exists()
    }
}

/// Create the configuration directory. Returns whether it was created.
pub fn create_config_dir(paths: &SetupPaths) -> Result<bool> {
    if paths.config_dir.exists() {
        return Ok(false);
    }

    fs::create_dir_all(&paths.config_dir).context("Failed to create config directory")?;
    Ok(true)
}

/// Write the default configuration file selecting `backend`.
pub fn create_config_file(paths: &SetupPaths, backend: StoreBackend, force: bool) -> Result<bool> {
    if paths.config_file.exists() && !force {
        return Ok(false);
    }

    let backend = match backend {
        StoreBackend::Api => "api",
        StoreBackend::File => "file",
    };
    fs::write(
        &paths.config_file,
        DEFAULT_CONFIG_TEMPLATE.replace("{backend}", backend),
    )
    .context("Failed to write config file")?;
    Ok(true)
}

/// Seed the JSON database with every collection, keeping existing data.
pub async fn initialize_database(paths: &SetupPaths) -> Result<bool> {
    JsonFileStore::new(&paths.database_file)
        .initialize(COLLECTIONS)
        .await
        .context("Failed to initialize database file")
}
