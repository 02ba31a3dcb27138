//! CLI type definitions
//!
//! This module contains the clap structure that defines the command line.

use clap::Parser;
use std::path::PathBuf;

use crate::domain::models::Config;

/// Literal third positional argument that enables deletion.
pub const DELETE_CONFIRMATION_TOKEN: &str = "delete";

#[derive(Parser, Debug)]
#[command(name = "cleanup-bucket")]
#[command(about = "Report and remove stale folders in an object-storage bucket", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Bucket to comb through
    pub bucket: Option<String>,

    /// Folders with contents older than this many days are eligible [default: 10]
    pub retention_days: Option<u32>,

    /// Pass the literal word `delete` to remove eligible folders
    pub confirmation: Option<String>,

    /// Remove eligible folders (same as the `delete` confirmation argument)
    #[arg(long)]
    pub delete: bool,

    /// Output in JSON format
    #[arg(short, long)]
    pub json: bool,

    /// Configuration file (YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of folders evaluated at once
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Storage CLI binary to invoke
    #[arg(long)]
    pub storage_command: Option<String>,
}

impl Cli {
    /// Deletion is enabled only by the `--delete` flag or the exact
    /// confirmation token; any other third argument means dry run.
    pub fn delete_requested(&self) -> bool {
        self.delete || self.confirmation.as_deref() == Some(DELETE_CONFIRMATION_TOKEN)
    }

    /// The bucket name, if one was supplied and it is not blank.
    pub fn bucket_name(&self) -> Option<&str> {
        self.bucket.as_deref().filter(|b| !b.trim().is_empty())
    }

    /// Layer command-line arguments over the loaded configuration.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(days) = self.retention_days {
            config.retention_days = days;
        }
        if self.delete_requested() {
            config.delete = true;
        }
        if let Some(concurrency) = self.concurrency {
            config.max_concurrent_folders = concurrency;
        }
        if let Some(ref command) = self.storage_command {
            config.storage.command.clone_from(command);
        }
    }
}
