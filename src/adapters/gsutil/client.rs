use async_trait::async_trait;
use std::process::{Output, Stdio};
use tokio::process::Command;
use tracing::{debug, instrument};

use super::listing::parse_listing;
use crate::domain::models::{BucketEntry, StorageConfig, StorageUri};
use crate::domain::ports::{ObjectStorage, StorageError};

/// Messages `gsutil` prints when a URL names nothing.
const NO_MATCH_MARKERS: &[&str] = &["No URLs matched", "matched no objects"];

/// `ObjectStorage` backed by the `gsutil` CLI.
///
/// Every call spawns one process and waits for it to exit.
#[derive(Debug, Clone)]
pub struct GsutilStorage {
    command: String,
    global_args: Vec<String>,
    scheme: String,
}

impl GsutilStorage {
    pub fn new(command: impl Into<String>, scheme: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            global_args: Vec::new(),
            scheme: scheme.into(),
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.command.clone(), config.scheme.clone())
            .with_global_args(config.global_args.clone())
    }

    /// Arguments placed before the subcommand on every invocation.
    #[must_use]
    pub fn with_global_args(mut self, args: Vec<String>) -> Self {
        self.global_args = args;
        self
    }

    fn describe(&self, args: &[&str]) -> String {
        std::iter::once(self.command.as_str())
            .chain(self.global_args.iter().map(String::as_str))
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ")
    }

    async fn run(&self, args: &[&str]) -> Result<Output, StorageError> {
        debug!(command = %self.describe(args), "running storage command");
        Command::new(&self.command)
            .args(&self.global_args)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| StorageError::Spawn {
                command: self.command.clone(),
                source,
            })
    }

    fn failure(&self, args: &[&str], output: &Output) -> StorageError {
        StorageError::CommandFailed {
            command: self.describe(args),
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
    }
}

fn is_no_match(output: &Output) -> bool {
    let stderr = String::from_utf8_lossy(&output.stderr);
    NO_MATCH_MARKERS.iter().any(|m| stderr.contains(m))
}

#[async_trait]
impl ObjectStorage for GsutilStorage {
    fn scheme(&self) -> &str {
        &self.scheme
    }

    #[instrument(skip(self), fields(uri = %uri))]
    async fn list(&self, uri: &StorageUri) -> Result<Vec<BucketEntry>, StorageError> {
        let args = ["ls", "-l", uri.as_str()];
        let output = self.run(&args).await?;

        if !output.status.success() {
            if is_no_match(&output) {
                return Err(StorageError::NotFound(uri.to_string()));
            }
            return Err(self.failure(&args, &output));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let entries = parse_listing(&stdout, &self.scheme);
        debug!(count = entries.len(), "listing parsed");
        Ok(entries)
    }

    #[instrument(skip(self), fields(uri = %uri))]
    async fn delete_prefix(&self, uri: &StorageUri) -> Result<(), StorageError> {
        let args = ["rm", "-r", uri.as_str()];
        let output = self.run(&args).await?;

        if output.status.success() {
            return Ok(());
        }
        if is_no_match(&output) {
            debug!("prefix already gone");
            return Ok(());
        }
        Err(self.failure(&args, &output))
    }
}
