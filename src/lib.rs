//! Bucket Sweep - retention sweep for object-storage buckets
//!
//! Lists the top-level folders of a bucket, keeps release-tagged folders and
//! archives, and reports (or removes) folders holding objects older than a
//! retention window.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): listing and retention models, the storage port
//! - **Service Layer** (`services`): retention policy and the bucket sweeper
//! - **Adapters** (`adapters`): `gsutil` CLI and in-memory storage
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```no_run
//! use bucket_sweep::adapters::GsutilStorage;
//! use bucket_sweep::services::{BucketSweeper, SweepOptions};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let storage = Arc::new(GsutilStorage::new("gsutil", "gs"));
//!     let options = SweepOptions { retention_days: 14, ..SweepOptions::default() };
//!     let report = BucketSweeper::new(storage, options).sweep("ci-artifacts").await?;
//!     for folder in report.eligible() {
//!         println!("{} is stale", folder.folder);
//!     }
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use adapters::{GsutilStorage, InMemoryStorage};
pub use domain::errors::{SweepError, SweepResult};
pub use domain::models::{
    BucketEntry, CandidateFolder, Config, DeletionOutcome, FolderOutcome, FolderStatus,
    RetentionDecision, StorageUri, SweepAction, SweepReport,
};
pub use domain::ports::{ObjectStorage, StorageError, StorageErrorKind};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{BucketSweeper, SweepOptions};
