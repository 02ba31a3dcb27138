//! Domain layer for the bucket retention sweep
//!
//! This module contains the listing and retention models, the storage port,
//! and the domain error types. Nothing in here talks to a real backend.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{SweepError, SweepResult};
