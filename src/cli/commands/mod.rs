//! CLI command implementations.

pub mod sweep;
