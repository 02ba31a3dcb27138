//! Infrastructure adapters for external systems.

pub mod gsutil;
pub mod memory;

pub use gsutil::GsutilStorage;
pub use memory::InMemoryStorage;
