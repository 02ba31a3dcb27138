//! Command-line interface

pub mod commands;
pub mod output;
pub mod types;

use clap::CommandFactory;

use crate::domain::errors::SweepError;

pub use types::{Cli, DELETE_CONFIRMATION_TOKEN};

/// Print `err` and exit with status 1.
///
/// A missing bucket name also prints the usage line.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    let missing_bucket = matches!(err.downcast_ref::<SweepError>(), Some(SweepError::MissingBucket));

    if json_mode {
        let body = serde_json::json!({ "error": format!("{err:#}") });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("Error: {err:#}");
    }

    if missing_bucket {
        eprintln!("{}", Cli::command().render_usage());
    }

    std::process::exit(1)
}
