use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::{Config, StoreBackend};

/// Project directory holding config files and the local database.
pub const CONFIG_DIR: &str = ".grcboard";

/// Prefix of environment overrides, nested keys separated by `__`.
pub const ENV_PREFIX: &str = "GRCBOARD_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("API base URL cannot be empty")]
    EmptyBaseUrl,

    #[error("Invalid API base URL: {0}. Must start with http:// or https://")]
    InvalidBaseUrl(String),

    #[error("Invalid timeout_secs: {0}. Must be at least 1")]
    InvalidTimeout(u64),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidRotation(String),

    #[error("Store path cannot be empty when the file backend is selected")]
    EmptyStorePath,
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .grcboard/config.yaml (project config, created by init)
    /// 3. .grcboard/local.yaml (project local overrides, optional)
    /// 4. Environment variables (GRCBOARD_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        Self::load_from_dir(CONFIG_DIR)
    }

    /// Same as [`load`](Self::load) with the config files read from `dir`.
    pub fn load_from_dir(dir: impl AsRef<Path>) -> Result<Config> {
        let dir = dir.as_ref();
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(dir.join("config.yaml")))
            .merge(Yaml::file(dir.join("local.yaml")))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let base_url = config.api.base_url.trim();
        if base_url.is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(config.api.base_url.clone()));
        }
        if config.api.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(config.api.timeout_secs));
        }

        if config.store.backend == StoreBackend::File && config.store.path.trim().is_empty() {
            return Err(ConfigError::EmptyStorePath);
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidRotation(config.logging.rotation.clone()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::RecordId;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:3001");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.store.backend, StoreBackend::Api);
        assert_eq!(config.store.path, ".grcboard/db.json");
        assert_eq!(config.logging.level, "warn");
        assert!(config.default_client_id.is_none());
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
default_client_id: 7
api:
  base_url: https://grc.example.com/api
  timeout_secs: 5
store:
  backend: file
  path: /tmp/grc.json
logging:
  level: debug
  format: json
  log_dir: /var/log/grcboard
  rotation: hourly
";

        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");

        assert_eq!(config.default_client_id, Some(RecordId::from("7")));
        assert_eq!(config.api.base_url, "https://grc.example.com/api");
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.store.backend, StoreBackend::File);
        assert_eq!(config.store.path, "/tmp/grc.json");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.log_dir.as_deref(), Some("/var/log/grcboard"));
        assert_eq!(config.logging.rotation, "hourly");

        ConfigLoader::validate(&config).expect("Parsed config should be valid");
    }

    #[test]
    fn test_validate_empty_base_url() {
        let mut config = Config::default();
        config.api.base_url = "  ".to_string();

        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyBaseUrl)
        ));
    }

    #[test]
    fn test_validate_base_url_scheme() {
        let mut config = Config::default();
        config.api.base_url = "localhost:3001".to_string();

        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config = Config::default();
        config.api.timeout_secs = 0;

        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidTimeout(0))
        ));
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "invalid".to_string();

        match ConfigLoader::validate(&config) {
            Err(ConfigError::InvalidLogLevel(level)) => assert_eq!(level, "invalid"),
            other => panic!("Expected InvalidLogLevel error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_invalid_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();

        match ConfigLoader::validate(&config) {
            Err(ConfigError::InvalidLogFormat(format)) => assert_eq!(format, "xml"),
            other => panic!("Expected InvalidLogFormat error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_invalid_rotation() {
        let mut config = Config::default();
        config.logging.rotation = "weekly".to_string();

        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidRotation(_))
        ));
    }

    #[test]
    fn test_validate_empty_store_path_only_matters_for_file_backend() {
        let mut config = Config::default();
        config.store.path = String::new();
        assert!(ConfigLoader::validate(&config).is_ok());

        config.store.backend = StoreBackend::File;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyStorePath)
        ));
    }

    #[test]
    fn test_hierarchical_merging() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("config.yaml"),
            "api:\n  base_url: http://records.internal:3001\n  timeout_secs: 10\nlogging:\n  level: info\n  format: json\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("local.yaml"),
            "api:\n  timeout_secs: 3\nlogging:\n  level: debug\n",
        )
        .unwrap();

        let config = temp_env::with_vars_unset(
            ["GRCBOARD_API__TIMEOUT_SECS", "GRCBOARD_LOGGING__LEVEL"],
            || ConfigLoader::load_from_dir(dir.path()).unwrap(),
        );

        assert_eq!(config.api.timeout_secs, 3, "Local override should win");
        assert_eq!(config.logging.level, "debug", "Local override should win for nested fields");
        assert_eq!(
            config.api.base_url, "http://records.internal:3001",
            "Base value should persist when not overridden"
        );
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_env_override() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("config.yaml"),
            "api:\n  timeout_secs: 10\nstore:\n  backend: api\n",
        )
        .unwrap();

        let config = temp_env::with_vars(
            [
                ("GRCBOARD_API__TIMEOUT_SECS", Some("45")),
                ("GRCBOARD_STORE__BACKEND", Some("file")),
                ("GRCBOARD_DEFAULT_CLIENT_ID", Some("acme")),
            ],
            || ConfigLoader::load_from_dir(dir.path()).unwrap(),
        );

        assert_eq!(config.api.timeout_secs, 45, "Environment should win over files");
        assert_eq!(config.store.backend, StoreBackend::File);
        assert_eq!(config.default_client_id, Some(RecordId::from("acme")));
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.yaml"), "logging:\n  level: loud\n").unwrap();

        let result = temp_env::with_var_unset("GRCBOARD_LOGGING__LEVEL", || {
            ConfigLoader::load_from_dir(dir.path())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_files_fall_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let config = temp_env::with_vars_unset(
            [
                "GRCBOARD_API__BASE_URL",
                "GRCBOARD_API__TIMEOUT_SECS",
                "GRCBOARD_STORE__BACKEND",
                "GRCBOARD_LOGGING__LEVEL",
            ],
            || ConfigLoader::load_from_dir(dir.path()).unwrap(),
        );
        assert_eq!(config.api.base_url, "http://localhost:3001");
    }
}
