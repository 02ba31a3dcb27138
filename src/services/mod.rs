pub mod bucket_sweeper;
pub mod retention_policy;

pub use bucket_sweeper::{BucketSweeper, RootClassification, SweepOptions};
pub use retention_policy::{compute_age, decide, is_archive_entry, is_version_tag};
