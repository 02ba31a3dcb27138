//! `gsutil` command-line adapter
//!
//! Wraps `gsutil ls -l` and `gsutil rm -r` behind the `ObjectStorage` port.

pub mod client;
pub mod listing;

pub use client::GsutilStorage;
pub use listing::{parse_line, parse_listing, ListingLineError};
