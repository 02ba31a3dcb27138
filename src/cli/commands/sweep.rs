//! The `cleanup-bucket` command.

use anyhow::Result;
use std::sync::Arc;
use tracing::debug;

use crate::adapters::GsutilStorage;
use crate::cli::output::{
    create_spinner_with_message, hidden_spinner, output, CommandOutput, ProgressBarExt,
    TableFormatter,
};
use crate::cli::types::{Cli, DELETE_CONFIRMATION_TOKEN};
use crate::domain::errors::SweepError;
use crate::domain::models::{Config, FolderStatus, StorageUri, SweepReport};
use crate::domain::ports::ObjectStorage;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::logging::{LogConfig, LoggerImpl};
use crate::services::{BucketSweeper, SweepOptions};

impl CommandOutput for SweepReport {
    fn to_human(&self) -> String {
        let mode = if self.dry_run { "dry run" } else { "delete" };
        let mut lines = vec![format!(
            "Bucket: {} (retention {} days, {})",
            self.bucket, self.threshold_days, mode
        )];

        if let Some(ref error) = self.root_listing_error {
            lines.push(format!("Could not list bucket: {error}"));
            return lines.join("\n");
        }

        if self.folders.is_empty() {
            lines.push("No candidate folders found.".to_string());
        } else {
            lines.push(TableFormatter::new().format_folders(self));
        }

        if !self.preserved.is_empty() {
            lines.push(format!("Preserved release folders: {}", self.preserved.join(", ")));
        }

        lines.push(format!(
            "Summary: {} candidate(s), {} eligible, {} deleted, {} delete failure(s), {} listing failure(s)",
            self.folders.len(),
            self.eligible().count(),
            self.count(FolderStatus::Deleted),
            self.count(FolderStatus::DeleteFailed),
            self.count(FolderStatus::ListFailed),
        ));

        if self.dry_run && self.eligible().next().is_some() {
            lines.push(format!(
                "Dry run: pass `{DELETE_CONFIRMATION_TOKEN}` or --delete to remove eligible folders."
            ));
        }

        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

impl From<&Config> for SweepOptions {
    fn from(config: &Config) -> Self {
        Self {
            retention_days: config.retention_days,
            delete: config.delete,
            max_concurrent_folders: config.max_concurrent_folders,
        }
    }
}

/// Entry point used by `main`: validates the bucket, loads
/// configuration, installs logging, runs the sweep and prints the report.
///
/// Returns the process exit status.
pub async fn execute(cli: Cli) -> Result<i32> {
    let bucket = cli.bucket_name().ok_or(SweepError::MissingBucket)?.to_string();

    let mut config = ConfigLoader::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    ConfigLoader::validate(&config)?;

    let _logger = LoggerImpl::init(&LogConfig::from(&config.logging))?;
    debug!(?config, "configuration loaded");

    let storage = Arc::new(GsutilStorage::from_config(&config.storage));
    let report = run_sweep(storage, &config, &bucket, cli.json).await?;

    output(&report, cli.json);
    Ok(report.exit_code())
}

/// Run one sweep against `storage` with the given configuration.
pub async fn run_sweep(
    storage: Arc<dyn ObjectStorage>,
    config: &Config,
    bucket: &str,
    json_mode: bool,
) -> Result<SweepReport> {
    let root = StorageUri::bucket_root(storage.scheme(), bucket);
    let sweeper = BucketSweeper::new(storage, SweepOptions::from(config));

    let spinner = if json_mode || !console::Term::stderr().is_term() {
        hidden_spinner()
    } else {
        create_spinner_with_message(format!("Combing through {root}"))
    };

    match sweeper.sweep(bucket).await {
        Ok(report) => {
            spinner.finish_success(format!("Combed through {root}"));
            Ok(report)
        }
        Err(err) => {
            spinner.finish_error(format!("Sweep of {root} failed"));
            Err(err.into())
        }
    }
}
