//! Common test utilities for integration tests
//!
//! Provides a scriptable stand-in for the `gsutil` binary and timestamp
//! helpers shared across the integration test files.

#![allow(dead_code)]

use bucket_sweep::domain::models::{Config, StorageConfig};
use bucket_sweep::services::retention_policy::TIMESTAMP_FORMAT;
use chrono::{DateTime, Duration, Utc};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create a temporary directory for test isolation
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Listing timestamp `days` days before `now`.
pub fn days_ago(now: DateTime<Utc>, days: i64) -> String {
    (now - Duration::days(days)).format(TIMESTAMP_FORMAT).to_string()
}

/// One `gsutil ls -l` object row.
pub fn object_row(size: u64, timestamp: &str, path: &str) -> String {
    format!("{size:>10}  {timestamp}  {path}")
}

/// Setup test logging
#[allow(dead_code)]
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

struct Response {
    args: String,
    stdout: String,
    stderr: String,
    exit_code: i32,
}

/// Builder for a shell script that answers like `gsutil`.
///
/// The script is run as `sh <script> <args...>` so no executable bit is
/// needed. Every invocation appends its arguments to a call log. Unknown
/// `ls` calls fail with "No URLs matched"; unknown `rm` calls succeed.
pub struct FakeGsutil {
    dir: TempDir,
    responses: Vec<Response>,
}

impl FakeGsutil {
    pub fn new() -> Self {
        Self {
            dir: temp_dir(),
            responses: Vec::new(),
        }
    }

    /// Answer `ls -l <uri>` with the given lines.
    pub fn listing(mut self, uri: &str, lines: &[String]) -> Self {
        let mut stdout = lines.join("\n");
        stdout.push('\n');
        self.responses.push(Response {
            args: format!("ls -l {uri}"),
            stdout,
            stderr: String::new(),
            exit_code: 0,
        });
        self
    }

    /// Make `ls -l <uri>` fail.
    pub fn list_failure(mut self, uri: &str, exit_code: i32, stderr: &str) -> Self {
        self.responses.push(Response {
            args: format!("ls -l {uri}"),
            stdout: String::new(),
            stderr: stderr.to_string(),
            exit_code,
        });
        self
    }

    /// Make `rm -r <uri>` fail.
    pub fn delete_failure(mut self, uri: &str, exit_code: i32, stderr: &str) -> Self {
        self.responses.push(Response {
            args: format!("rm -r {uri}"),
            stdout: String::new(),
            stderr: stderr.to_string(),
            exit_code,
        });
        self
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn script_path(&self) -> PathBuf {
        self.dir.path().join("gsutil.sh")
    }

    pub fn log_path(&self) -> PathBuf {
        self.dir.path().join("calls.log")
    }

    /// Write the script and return `self` for further use.
    pub fn install(self) -> Self {
        let mut script = String::from("#!/bin/sh\n");
        let _ = writeln!(script, "echo \"$*\" >> '{}'", self.log_path().display());
        script.push_str("case \"$*\" in\n");

        for response in &self.responses {
            let _ = writeln!(script, "  '{}')", response.args);
            if !response.stdout.is_empty() {
                script.push_str("    cat <<'__OUT__'\n");
                script.push_str(&response.stdout);
                script.push_str("__OUT__\n");
            }
            if !response.stderr.is_empty() {
                script.push_str("    cat >&2 <<'__ERR__'\n");
                script.push_str(&response.stderr);
                script.push_str("\n__ERR__\n");
            }
            let _ = writeln!(script, "    exit {}\n    ;;", response.exit_code);
        }

        script.push_str("  rm\\ *)\n    exit 0\n    ;;\n");
        script.push_str("  *)\n    echo \"CommandException: No URLs matched: $*\" >&2\n    exit 1\n    ;;\n");
        script.push_str("esac\n");

        std::fs::write(self.script_path(), script).expect("Failed to write fake gsutil");
        self
    }

    /// Arguments of every invocation so far, one string per call.
    pub fn calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.log_path())
            .map(|log| log.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Storage settings that run this script through `sh`.
    pub fn storage_config(&self) -> StorageConfig {
        StorageConfig {
            command: "sh".to_string(),
            global_args: vec![self.script_path().display().to_string()],
            scheme: "gs".to_string(),
        }
    }

    pub fn config(&self) -> Config {
        Config {
            storage: self.storage_config(),
            ..Config::default()
        }
    }
}

impl Default for FakeGsutil {
    fn default() -> Self {
        Self::new()
    }
}
