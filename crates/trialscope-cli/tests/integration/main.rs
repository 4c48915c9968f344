//! Integration tests for the trialscope CLI against real databases.
//!
//! These tests are behind the `integration-tests` feature flag and won't run
//! with regular `cargo test`:
//!
//! ```bash
//! cargo test -p trialscope-cli --features integration-tests --test integration
//! ```

#![cfg(feature = "integration-tests")]

mod sqlite;

use std::path::Path;
use std::process::{Command, Output};

/// Run the trialscope CLI with the given arguments and return the output.
pub fn run_cli(data_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_trialscope"))
        .arg("--data-dir")
        .arg(data_dir)
        .args(args)
        .env_remove("AACT_DATABASE_URL")
        .env_remove("AACT_DB_SCHEMA")
        .output()
        .expect("failed to execute trialscope CLI")
}

/// Run the trialscope CLI and assert it succeeds.
pub fn run_cli_success(data_dir: &Path, args: &[&str]) -> Output {
    let output = run_cli(data_dir, args);
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        panic!(
            "CLI failed with status {:?}\nstderr: {}\nstdout: {}",
            output.status.code(),
            stderr,
            stdout
        );
    }
    output
}
