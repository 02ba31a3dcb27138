//! Bucket Sweeper
//!
//! Walks the top level of a bucket, applies the retention policy to every
//! candidate folder and, when deletion is enabled, removes the eligible ones.
//!
//! Failures while listing the bucket, listing a folder or parsing an entry are
//! logged and recorded in the report; they never abort the sweep. A failed
//! deletion is recorded as well and the sweep moves on to the next folder.

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{error, info, info_span, instrument, warn, Instrument};

use crate::domain::errors::{SweepError, SweepResult};
use crate::domain::models::{
    BucketEntry, CandidateFolder, DeletionOutcome, FolderOutcome, StorageUri, SweepReport,
};
use crate::domain::ports::{ObjectStorage, StorageError};
use crate::services::retention_policy::{self, Exclusion};

/// Knobs for a single sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepOptions {
    /// Retention window in days
    pub retention_days: u32,
    /// Remove eligible folders; `false` is a dry run
    pub delete: bool,
    /// Folders evaluated at once
    pub max_concurrent_folders: usize,
}

impl Default for SweepOptions {
    fn default() -> Self {
        Self {
            retention_days: 10,
            delete: false,
            max_concurrent_folders: 1,
        }
    }
}

/// Top-level folders of a bucket split by what the sweep does with them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootClassification {
    /// Folders the retention policy will evaluate, in listing order
    pub candidates: Vec<CandidateFolder>,
    /// Release-tagged folders that are always kept
    pub preserved: Vec<String>,
    /// Archive entries left alone
    pub archives_skipped: usize,
}

/// Service that sweeps stale folders out of one bucket.
///
/// # Example
///
/// ```no_run
/// use bucket_sweep::adapters::GsutilStorage;
/// use bucket_sweep::services::{BucketSweeper, SweepOptions};
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let storage = Arc::new(GsutilStorage::new("gsutil", "gs"));
/// let sweeper = BucketSweeper::new(storage, SweepOptions::default());
/// let report = sweeper.sweep("my-bucket").await?;
/// println!("{} folder(s) eligible", report.eligible().count());
/// # Ok(())
/// # }
/// ```
pub struct BucketSweeper {
    storage: Arc<dyn ObjectStorage>,
    options: SweepOptions,
}

impl BucketSweeper {
    pub fn new(storage: Arc<dyn ObjectStorage>, options: SweepOptions) -> Self {
        Self { storage, options }
    }

    pub fn options(&self) -> &SweepOptions {
        &self.options
    }

    /// List the entries at the root of `bucket`.
    #[instrument(skip(self))]
    pub async fn list_top_level(&self, bucket: &str) -> Result<Vec<BucketEntry>, StorageError> {
        let uri = StorageUri::bucket_root(self.storage.scheme(), bucket);
        self.storage.list(&uri).await
    }

    /// List the entries one level inside a candidate folder.
    #[instrument(skip(self, folder), fields(folder = %folder.name))]
    pub async fn list_folder_entries(
        &self,
        folder: &CandidateFolder,
    ) -> Result<Vec<BucketEntry>, StorageError> {
        self.storage.list(&folder.prefix).await
    }

    /// Split root entries into candidates, preserved release folders and
    /// skipped archives. Duplicate folder names are evaluated once.
    pub fn classify_root(&self, bucket: &str, entries: &[BucketEntry]) -> RootClassification {
        let scheme = self.storage.scheme();
        let mut classification = RootClassification::default();
        let mut seen = HashSet::new();

        for entry in entries {
            match retention_policy::classify_root_entry(entry) {
                Ok(name) => {
                    if seen.insert(name.to_string()) {
                        classification
                            .candidates
                            .push(CandidateFolder::new(scheme, bucket, name));
                    }
                }
                Err(Exclusion::VersionTag(name)) => {
                    info!(folder = %name, "preserving release folder");
                    if !classification.preserved.contains(&name) {
                        classification.preserved.push(name);
                    }
                }
                Err(Exclusion::Archive) => classification.archives_skipped += 1,
                Err(Exclusion::NotAFolder) => {}
            }
        }

        classification
    }

    /// Recursively delete a folder prefix. No retry is attempted.
    #[instrument(skip(self, folder), fields(prefix = %folder.prefix))]
    pub async fn delete_folder(&self, folder: &CandidateFolder) -> DeletionOutcome {
        info!(folder = %folder.name, "deleting folder");
        match self.storage.delete_prefix(&folder.prefix).await {
            Ok(()) => {
                info!(folder = %folder.name, "folder deleted");
                DeletionOutcome::Deleted
            }
            Err(err) => {
                error!(
                    folder = %folder.name,
                    error = %err,
                    kind = ?err.kind(),
                    "failed to delete folder"
                );
                DeletionOutcome::Failed {
                    exit_code: err.exit_code(),
                    message: err.to_string(),
                }
            }
        }
    }

    /// Sweep `bucket` against the current time.
    pub async fn sweep(&self, bucket: &str) -> SweepResult<SweepReport> {
        self.sweep_at(bucket, Utc::now()).await
    }

    /// Sweep `bucket`, measuring ages against `now`.
    pub async fn sweep_at(&self, bucket: &str, now: DateTime<Utc>) -> SweepResult<SweepReport> {
        if bucket.trim().is_empty() {
            return Err(SweepError::MissingBucket);
        }

        let mut report = SweepReport::new(bucket, self.options.retention_days, !self.options.delete, now);
        let span = info_span!("sweep", run_id = %report.run_id, bucket = %bucket);

        async {
            info!(
                threshold_days = self.options.retention_days,
                dry_run = report.dry_run,
                "combing through bucket"
            );

            let root = match self.list_top_level(bucket).await {
                Ok(entries) => entries,
                Err(err) => {
                    warn!(error = %err, kind = ?err.kind(), "could not list bucket root");
                    report.root_listing_error = Some(err.to_string());
                    return;
                }
            };

            let classification = self.classify_root(bucket, &root);
            report.preserved = classification.preserved;
            report.archives_skipped = classification.archives_skipped;

            let concurrency = self.options.max_concurrent_folders.max(1);
            report.folders = stream::iter(classification.candidates.iter())
                .map(|folder| self.evaluate_folder(folder, now))
                .buffered(concurrency)
                .collect()
                .await;

            info!(
                candidates = report.folders.len(),
                eligible = report.eligible().count(),
                preserved = report.preserved.len(),
                "sweep finished"
            );
        }
        .instrument(span)
        .await;

        Ok(report)
    }

    async fn evaluate_folder(&self, folder: &CandidateFolder, now: DateTime<Utc>) -> FolderOutcome {
        let entries = match self.list_folder_entries(folder).await {
            Ok(entries) => entries,
            Err(err) => {
                warn!(
                    folder = %folder.name,
                    error = %err,
                    kind = ?err.kind(),
                    "could not comb through folder"
                );
                return FolderOutcome::listing_failed(folder, err.to_string());
            }
        };

        let decision = retention_policy::decide(folder, &entries, self.options.retention_days, now)
            .with_action(self.options.delete);

        if decision.eligible {
            info!(
                folder = %folder.name,
                age_days = ?decision.age_days,
                threshold_days = self.options.retention_days,
                action = decision.action.as_str(),
                "folder created before retention window"
            );
        }

        let deletion = if decision.should_delete() {
            Some(self.delete_folder(folder).await)
        } else {
            None
        };

        FolderOutcome::evaluated(folder, decision, deletion)
    }
}
