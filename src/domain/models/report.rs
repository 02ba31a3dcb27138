//! Sweep report models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entry::StorageUri;
use super::retention::{CandidateFolder, RetentionDecision};

/// Result of invoking the recursive delete on one folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum DeletionOutcome {
    Deleted,
    Failed {
        /// Exit status of the storage tool, if it produced one
        exit_code: Option<i32>,
        message: String,
    },
}

/// Display status of a folder in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FolderStatus {
    /// Younger than the retention window
    Keep,
    /// Older than the retention window, not deleted (dry run)
    Eligible,
    /// Older than the retention window and removed
    Deleted,
    /// Older than the retention window, removal failed
    DeleteFailed,
    /// Folder contents could not be listed
    ListFailed,
}

impl FolderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Keep => "keep",
            Self::Eligible => "eligible",
            Self::Deleted => "deleted",
            Self::DeleteFailed => "delete_failed",
            Self::ListFailed => "list_failed",
        }
    }
}

/// Everything the sweep learned about one candidate folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderOutcome {
    pub folder: String,
    pub prefix: StorageUri,
    pub status: FolderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision: Option<RetentionDecision>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deletion: Option<DeletionOutcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listing_error: Option<String>,
}

impl FolderOutcome {
    /// Folder whose contents were listed and evaluated.
    pub fn evaluated(
        folder: &CandidateFolder,
        decision: RetentionDecision,
        deletion: Option<DeletionOutcome>,
    ) -> Self {
        let status = match (&deletion, decision.eligible) {
            (Some(DeletionOutcome::Deleted), _) => FolderStatus::Deleted,
            (Some(DeletionOutcome::Failed { .. }), _) => FolderStatus::DeleteFailed,
            (None, true) => FolderStatus::Eligible,
            (None, false) => FolderStatus::Keep,
        };
        Self {
            folder: folder.name.clone(),
            prefix: folder.prefix.clone(),
            status,
            decision: Some(decision),
            deletion,
            listing_error: None,
        }
    }

    /// Folder whose listing failed; it is left untouched.
    pub fn listing_failed(folder: &CandidateFolder, error: impl Into<String>) -> Self {
        Self {
            folder: folder.name.clone(),
            prefix: folder.prefix.clone(),
            status: FolderStatus::ListFailed,
            decision: None,
            deletion: None,
            listing_error: Some(error.into()),
        }
    }

    pub fn is_eligible(&self) -> bool {
        self.decision.as_ref().is_some_and(|d| d.eligible)
    }

    pub fn age_days(&self) -> Option<i64> {
        self.decision.as_ref().and_then(|d| d.age_days)
    }
}

/// Result of one sweep over a bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    pub run_id: Uuid,
    pub bucket: String,
    pub threshold_days: u32,
    pub dry_run: bool,
    pub started_at: DateTime<Utc>,

    /// Version-tagged folders that were preserved without inspection
    pub preserved: Vec<String>,

    /// Archive entries in the bucket root that were not considered
    pub archives_skipped: usize,

    /// Set when the bucket root itself could not be listed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_listing_error: Option<String>,

    /// One outcome per candidate folder, in listing order
    pub folders: Vec<FolderOutcome>,
}

impl SweepReport {
    pub fn new(bucket: impl Into<String>, threshold_days: u32, dry_run: bool, started_at: DateTime<Utc>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            bucket: bucket.into(),
            threshold_days,
            dry_run,
            started_at,
            preserved: Vec::new(),
            archives_skipped: 0,
            root_listing_error: None,
            folders: Vec::new(),
        }
    }

    pub fn eligible(&self) -> impl Iterator<Item = &FolderOutcome> {
        self.folders.iter().filter(|f| f.is_eligible())
    }

    pub fn count(&self, status: FolderStatus) -> usize {
        self.folders.iter().filter(|f| f.status == status).count()
    }

    /// Process exit status for this sweep.
    ///
    /// `0` unless a deletion failed, in which case the first failed deletion's
    /// tool exit status is surfaced (`1` when the tool produced none).
    pub fn exit_code(&self) -> i32 {
        self.folders
            .iter()
            .find_map(|f| match &f.deletion {
                Some(DeletionOutcome::Failed { exit_code, .. }) => {
                    Some(exit_code.filter(|code| *code != 0).unwrap_or(1))
                }
                _ => None,
            })
            .unwrap_or(0)
    }
}
