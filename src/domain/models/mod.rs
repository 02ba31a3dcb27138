pub mod config;
pub mod entry;
pub mod report;
pub mod retention;

pub use config::{Config, LoggingConfig, StorageConfig};
pub use entry::{BucketEntry, StorageUri};
pub use report::{DeletionOutcome, FolderOutcome, FolderStatus, SweepReport};
pub use retention::{CandidateFolder, RetentionDecision, SweepAction};
