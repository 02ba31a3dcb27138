use async_trait::async_trait;
use thiserror::Error;

use crate::domain::models::{BucketEntry, StorageUri};

/// Whether a storage failure is likely to go away on its own.
///
/// The sweep never retries; the classification is carried into logs so an
/// operator can tell a flaky network from a permission problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorKind {
    Transient,
    Permanent,
}

/// Error type for storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to launch `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with status {}: {stderr}", format_exit_code(.exit_code))]
    CommandFailed {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("No objects matched {0}")]
    NotFound(String),
}

fn format_exit_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "unknown".to_string(), |c| c.to_string())
}

const TRANSIENT_MARKERS: &[&str] = &[
    "timed out",
    "timeout",
    "connection reset",
    "connection refused",
    "temporarily unavailable",
    "temporary failure",
    "too many requests",
    "429",
    "500",
    "502",
    "503",
    "504",
];

impl StorageError {
    pub fn kind(&self) -> StorageErrorKind {
        match self {
            Self::Spawn { .. } | Self::NotFound(_) => StorageErrorKind::Permanent,
            Self::CommandFailed { stderr, .. } => {
                let stderr = stderr.to_lowercase();
                if TRANSIENT_MARKERS.iter().any(|m| stderr.contains(m)) {
                    StorageErrorKind::Transient
                } else {
                    StorageErrorKind::Permanent
                }
            }
        }
    }

    /// Exit status reported by the storage tool, if any.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::CommandFailed { exit_code, .. } => *exit_code,
            Self::Spawn { .. } | Self::NotFound(_) => None,
        }
    }
}

/// Storage backend interface used by the sweep.
///
/// Implementations wrap a CLI tool or an SDK; the retention policy never sees
/// which one.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// URI scheme served by this backend (`gs`)
    fn scheme(&self) -> &str;

    /// List the entries one level below `uri`.
    ///
    /// Rows the backend printed but that could not be understood are skipped
    /// by the implementation; only a failure of the whole call is an error.
    async fn list(&self, uri: &StorageUri) -> Result<Vec<BucketEntry>, StorageError>;

    /// Recursively remove every object under `uri`.
    ///
    /// Removing a prefix that no longer exists succeeds.
    async fn delete_prefix(&self, uri: &StorageUri) -> Result<(), StorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed(stderr: &str) -> StorageError {
        StorageError::CommandFailed {
            command: "gsutil ls -l gs://myb/".to_string(),
            exit_code: Some(1),
            stderr: stderr.to_string(),
        }
    }

    #[test]
    fn test_error_kind_classification() {
        assert_eq!(
            failed("ServiceException: 503 Backend Error").kind(),
            StorageErrorKind::Transient
        );
        assert_eq!(
            failed("Connection reset by peer").kind(),
            StorageErrorKind::Transient
        );
        assert_eq!(
            failed("AccessDeniedException: 403 Forbidden").kind(),
            StorageErrorKind::Permanent
        );
        assert_eq!(
            StorageError::NotFound("gs://myb/x/".into()).kind(),
            StorageErrorKind::Permanent
        );
    }

    #[test]
    fn test_display_and_exit_code() {
        let err = failed("AccessDeniedException: 403");
        assert_eq!(err.exit_code(), Some(1));
        assert_eq!(
            err.to_string(),
            "`gsutil ls -l gs://myb/` exited with status 1: AccessDeniedException: 403"
        );

        let err = StorageError::CommandFailed {
            command: "gsutil rm -r gs://myb/a/".to_string(),
            exit_code: None,
            stderr: "killed".to_string(),
        };
        assert!(err.to_string().contains("status unknown"));
        assert_eq!(err.exit_code(), None);
    }
}
