//! Retention policy
//!
//! Pure functions deciding which top-level folders of a bucket are candidates
//! and whether a candidate's contents are older than the retention window.
//!
//! # Policy
//!
//! - Folders named like a release (`v1.2.3`, `1.2.3-rc1`) are never touched.
//! - Root entries whose path ends in `tar` are archives and never candidates.
//! - A candidate is eligible as soon as ONE object inside it is older than the
//!   threshold (first match wins, the remaining objects are not inspected).

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::domain::errors::{SweepError, SweepResult};
use crate::domain::models::{BucketEntry, CandidateFolder, RetentionDecision, SweepAction};

/// Listing timestamp format (`2024-03-01T12:00:00Z`).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

static VERSION_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v?\d+\.\d+\.\d+").expect("version tag pattern is valid"));

/// True if `name` looks like a release tag: optional `v`, three dot-separated
/// numbers, then anything.
pub fn is_version_tag(name: &str) -> bool {
    VERSION_TAG.is_match(name)
}

/// True if the entry is a packaged archive (path ends in `tar`).
pub fn is_archive_entry(entry: &BucketEntry) -> bool {
    entry.path.ends_with("tar")
}

/// Why a bucket root entry did not become a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exclusion {
    /// Path ends in `tar`
    Archive,
    /// Object row at the bucket root, not a folder
    NotAFolder,
    /// Folder name is a release tag
    VersionTag(String),
}

/// Classify one bucket root entry.
///
/// Returns the folder name for candidates, or the reason the entry is left alone.
pub fn classify_root_entry(entry: &BucketEntry) -> Result<&str, Exclusion> {
    if is_archive_entry(entry) {
        return Err(Exclusion::Archive);
    }
    if !entry.is_prefix() {
        return Err(Exclusion::NotAFolder);
    }
    let name = entry.folder_segment().ok_or(Exclusion::NotAFolder)?;
    if is_version_tag(name) {
        return Err(Exclusion::VersionTag(name.to_string()));
    }
    Ok(name)
}

/// Whole days between the entry's timestamp and `now`.
///
/// Timestamps in the future yield zero or a negative age.
pub fn compute_age(entry: &BucketEntry, now: DateTime<Utc>) -> SweepResult<i64> {
    let raw = entry
        .timestamp
        .as_deref()
        .ok_or_else(|| SweepError::MissingTimestamp(entry.path.clone()))?;
    let parsed = NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT).map_err(|e| {
        SweepError::InvalidTimestamp {
            path: entry.path.clone(),
            value: raw.to_string(),
            reason: e.to_string(),
        }
    })?;
    Ok((now - parsed.and_utc()).num_days())
}

/// Apply the retention window to the contents of one folder.
///
/// Prefix rows (sub-folders) are not inspected. Objects whose timestamp cannot
/// be parsed are logged and counted as skipped. The returned decision always
/// carries `SweepAction::Report`; see [`RetentionDecision::with_action`].
pub fn decide(
    folder: &CandidateFolder,
    entries: &[BucketEntry],
    threshold_days: u32,
    now: DateTime<Utc>,
) -> RetentionDecision {
    let threshold = i64::from(threshold_days);
    let mut decision = RetentionDecision {
        folder: folder.name.clone(),
        age_days: None,
        eligible: false,
        action: SweepAction::Report,
        entries_inspected: 0,
        entries_skipped: 0,
    };

    for entry in entries {
        if entry.is_prefix() {
            debug!(folder = %folder.name, path = %entry.path, "skipping nested prefix");
            continue;
        }

        let age = match compute_age(entry, now) {
            Ok(age) => age,
            Err(err) => {
                warn!(folder = %folder.name, error = %err, "could not comb through entry");
                decision.entries_skipped += 1;
                continue;
            }
        };

        decision.entries_inspected += 1;
        if age > threshold {
            decision.age_days = Some(age);
            decision.eligible = true;
            break;
        }
        decision.age_days = Some(decision.age_days.map_or(age, |oldest| oldest.max(age)));
    }

    decision
}
