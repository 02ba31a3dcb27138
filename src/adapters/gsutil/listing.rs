//! Parser for `gsutil ls -l` output.
//!
//! The long listing prints one row per entry:
//!
//! ```text
//! gs://myb/abc123/
//!       1024  2024-05-01T08:30:00Z  gs://myb/abc123/build.log
//! TOTAL: 1 objects, 1024 bytes (1 KiB)
//! ```
//!
//! Prefix rows carry only the path. Object rows carry size and timestamp
//! columns in front of the path. The path column is located by its scheme so
//! paths containing spaces survive.

use thiserror::Error;
use tracing::debug;

use crate::domain::models::BucketEntry;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ListingLineError {
    #[error("no {0}:// path column")]
    MissingPath(String),

    #[error("expected size and timestamp columns, found {0} column(s)")]
    UnexpectedColumns(usize),

    #[error("invalid size column '{0}'")]
    InvalidSize(String),
}

/// Parse one line. `Ok(None)` for blank and summary lines.
pub fn parse_line(line: &str, scheme: &str) -> Result<Option<BucketEntry>, ListingLineError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with("TOTAL:") {
        return Ok(None);
    }

    let marker = format!("{scheme}://");
    let Some(path_start) = line.find(&marker) else {
        return Err(ListingLineError::MissingPath(scheme.to_string()));
    };
    let path = line[path_start..].trim_end();
    let columns: Vec<&str> = line[..path_start].split_whitespace().collect();

    match columns.as_slice() {
        [] => Ok(Some(BucketEntry::prefix(path))),
        [size, timestamp] => {
            let size = size
                .parse::<u64>()
                .map_err(|_| ListingLineError::InvalidSize((*size).to_string()))?;
            Ok(Some(BucketEntry::object(path, *timestamp, Some(size))))
        }
        other => Err(ListingLineError::UnexpectedColumns(other.len())),
    }
}

/// Parse a whole listing, skipping lines that cannot be understood.
pub fn parse_listing(output: &str, scheme: &str) -> Vec<BucketEntry> {
    output
        .lines()
        .filter_map(|line| match parse_line(line, scheme) {
            Ok(entry) => entry,
            Err(err) => {
                debug!(line = %line, error = %err, "skipping unparseable listing line");
                None
            }
        })
        .collect()
}
