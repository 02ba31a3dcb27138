//! Domain errors for the bucket retention sweep.

use thiserror::Error;

use super::ports::StorageError;

/// Domain-level errors that can occur during a sweep.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Bucket name is required")]
    MissingBucket,

    #[error("Entry has no timestamp: {0}")]
    MissingTimestamp(String),

    #[error("Invalid timestamp '{value}' on {path}: {reason}")]
    InvalidTimestamp {
        path: String,
        value: String,
        reason: String,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type SweepResult<T> = Result<T, SweepError>;
