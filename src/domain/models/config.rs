use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for bucket-sweep
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Folders whose contents are older than this many days are eligible
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,

    /// Remove eligible folders instead of only reporting them
    #[serde(default)]
    pub delete: bool,

    /// Number of folders evaluated at once (1 = strictly sequential)
    #[serde(default = "default_max_concurrent_folders")]
    pub max_concurrent_folders: usize,

    /// Storage backend configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

const fn default_retention_days() -> u32 {
    10
}

const fn default_max_concurrent_folders() -> usize {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            retention_days: default_retention_days(),
            delete: false,
            max_concurrent_folders: default_max_concurrent_folders(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Storage CLI configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StorageConfig {
    /// Storage CLI binary
    #[serde(default = "default_storage_command")]
    pub command: String,

    /// Arguments placed before every subcommand (e.g. `-o` boto overrides)
    #[serde(default)]
    pub global_args: Vec<String>,

    /// URI scheme of the bucket (`gs`)
    #[serde(default = "default_scheme")]
    pub scheme: String,
}

fn default_storage_command() -> String {
    "gsutil".to_string()
}

fn default_scheme() -> String {
    "gs".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            command: default_storage_command(),
            global_args: Vec::new(),
            scheme: default_scheme(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling JSON log files (stderr only when unset)
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// File rotation: daily, hourly, never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}
