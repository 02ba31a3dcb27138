//! Listing entries and storage locations.
//!
//! A `BucketEntry` is one row of a storage listing. Object rows carry the raw
//! timestamp text as the backend printed it; parsing happens when an age is
//! computed so a single bad row can be skipped without losing the listing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A `scheme://bucket/prefix/` location in object storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageUri(String);

impl StorageUri {
    /// Root of a bucket, e.g. `gs://myb/`.
    pub fn bucket_root(scheme: &str, bucket: &str) -> Self {
        Self(format!("{scheme}://{bucket}/"))
    }

    /// Prefix of a top-level folder, e.g. `gs://myb/abc123/`.
    pub fn folder(scheme: &str, bucket: &str, folder: &str) -> Self {
        Self(format!("{scheme}://{bucket}/{folder}/"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StorageUri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One row of a storage listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketEntry {
    /// Full path including scheme, e.g. `gs://myb/abc123/build.log`
    pub path: String,

    /// Last-modified timestamp as printed by the backend (`YYYY-MM-DDTHH:MM:SSZ`).
    /// `None` for prefix rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    /// Object size in bytes, when the backend reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
}

impl BucketEntry {
    /// A prefix (folder) row such as `gs://myb/abc123/`.
    pub fn prefix(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            timestamp: None,
            size_bytes: None,
        }
    }

    /// An object row with its raw timestamp column.
    pub fn object(path: impl Into<String>, timestamp: impl Into<String>, size_bytes: Option<u64>) -> Self {
        Self {
            path: path.into(),
            timestamp: Some(timestamp.into()),
            size_bytes,
        }
    }

    /// Prefix rows have no timestamp and end with a slash.
    pub fn is_prefix(&self) -> bool {
        self.timestamp.is_none() && self.path.ends_with('/')
    }

    /// The second-to-last `/` segment of the path with the scheme removed.
    ///
    /// For a top-level prefix row `gs://myb/abc123/` this is the folder name
    /// `abc123`. Paths with fewer than three segments (the bucket root itself)
    /// have no folder segment.
    pub fn folder_segment(&self) -> Option<&str> {
        let without_scheme = self
            .path
            .split_once("://")
            .map_or(self.path.as_str(), |(_, rest)| rest);
        let segments: Vec<&str> = without_scheme.split('/').collect();
        if segments.len() < 3 {
            return None;
        }
        let name = segments[segments.len() - 2];
        (!name.is_empty()).then_some(name)
    }
}
