//! Port trait definitions (Hexagonal Architecture)
//!
//! - ObjectStorage: listing and recursive deletion under a storage prefix
//!
//! The retention policy only talks to these traits, so it stays independent of
//! the concrete storage CLI or SDK behind them.

pub mod object_storage;

pub use object_storage::{ObjectStorage, StorageError, StorageErrorKind};
