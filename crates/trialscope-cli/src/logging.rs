//! Tracing subscriber setup. Events go to stderr so stdout carries only payloads.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Builds the filter for `directive`, dropping to errors only when `quiet`.
pub fn filter(directive: &str, quiet: bool) -> Result<EnvFilter> {
    let directive = if quiet { "error" } else { directive };
    EnvFilter::try_new(directive).map_err(|e| anyhow!("invalid log filter '{directive}': {e}"))
}

pub fn init_tracing(directive: &str, quiet: bool) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(filter(directive, quiet)?)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .map_err(|error| anyhow!("failed to initialize tracing subscriber: {error}"))
}
