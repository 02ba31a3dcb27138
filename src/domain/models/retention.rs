//! Retention domain models
//!
//! Contains the per-folder view of a sweep: which folders are candidates and
//! what the retention policy concluded about each of them.

use serde::{Deserialize, Serialize};

use super::entry::StorageUri;

/// A non-release, non-archive top-level folder considered for deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateFolder {
    /// Folder name as it appears in the bucket root (`abc123`)
    pub name: String,

    /// Full prefix of the folder (`gs://myb/abc123/`)
    pub prefix: StorageUri,
}

impl CandidateFolder {
    pub fn new(scheme: &str, bucket: &str, name: impl Into<String>) -> Self {
        let name = name.into();
        let prefix = StorageUri::folder(scheme, bucket, &name);
        Self { name, prefix }
    }
}

/// What the sweep does with an eligible folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepAction {
    /// Report only (dry run, or folder not eligible)
    Report,
    /// Remove the folder prefix
    Delete,
}

impl SweepAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Report => "report",
            Self::Delete => "delete",
        }
    }
}

/// Outcome of applying the retention policy to one folder.
///
/// # Business Rules
///
/// - A folder is eligible as soon as one contained object is older than the
///   threshold; the remaining objects are not inspected.
/// - `action` is `Delete` only when the folder is eligible and deletion was
///   explicitly enabled for the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionDecision {
    /// Folder name
    pub folder: String,

    /// Age in whole days of the object that made the folder eligible, or the
    /// oldest age seen when none did. `None` if no object had a usable timestamp.
    pub age_days: Option<i64>,

    /// Whether `age_days` exceeded the threshold
    pub eligible: bool,

    /// Action chosen for the folder
    pub action: SweepAction,

    /// Objects whose timestamp was examined
    pub entries_inspected: usize,

    /// Objects skipped because their timestamp could not be parsed
    pub entries_skipped: usize,
}

impl RetentionDecision {
    /// Resolve the action for this decision given the run's delete switch.
    #[must_use]
    pub fn with_action(mut self, delete_enabled: bool) -> Self {
        self.action = if self.eligible && delete_enabled {
            SweepAction::Delete
        } else {
            SweepAction::Report
        };
        self
    }

    pub fn should_delete(&self) -> bool {
        self.eligible && self.action == SweepAction::Delete
    }
}
