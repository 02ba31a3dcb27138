use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::models::config::Config;

/// Project-local config file picked up from the working directory
pub const DEFAULT_CONFIG_FILE: &str = "bucket-sweep.yaml";

/// Prefix of environment overrides (`BUCKET_SWEEP_STORAGE__COMMAND`)
pub const ENV_PREFIX: &str = "BUCKET_SWEEP_";

const MAX_CONCURRENT_FOLDERS: usize = 64;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    MissingFile(PathBuf),

    #[error("Failed to extract configuration: {0}")]
    Extract(#[from] Box<figment::Error>),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidRotation(String),

    #[error("Invalid max_concurrent_folders: {0}. Must be between 1 and 64")]
    InvalidConcurrency(usize),

    #[error("Storage command cannot be empty")]
    EmptyStorageCommand,

    #[error("Invalid storage scheme: '{0}'. Must be non-empty and alphanumeric")]
    InvalidScheme(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. ./bucket-sweep.yaml (optional)
    /// 3. `explicit` file passed with `--config` (must exist)
    /// 4. Environment variables (BUCKET_SWEEP_* prefix, `__` for nesting)
    ///
    /// Command-line arguments are applied on top by the caller, which then
    /// runs [`ConfigLoader::validate`] on the merged result.
    pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
        let mut figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(DEFAULT_CONFIG_FILE));

        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::MissingFile(path.to_path_buf()));
            }
            figment = figment.merge(Yaml::file(path));
        }

        let config: Config = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(Box::new)?;

        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.max_concurrent_folders == 0 || config.max_concurrent_folders > MAX_CONCURRENT_FOLDERS {
            return Err(ConfigError::InvalidConcurrency(config.max_concurrent_folders));
        }

        if config.storage.command.trim().is_empty() {
            return Err(ConfigError::EmptyStorageCommand);
        }

        let scheme = &config.storage.scheme;
        if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ConfigError::InvalidScheme(scheme.clone()));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
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
