//! TrialScope CLI library.
//!
//! This module exposes internal types for testing purposes.
//! The main entry point is the `trialscope` binary.

pub mod catalog;
pub mod cli;
pub mod logging;
#[cfg(feature = "metadata-provider")]
pub mod metadata;
pub mod output;
#[cfg(feature = "serve")]
pub mod server;

// Re-export commonly used types
pub use catalog::{load_catalog, Catalog};
pub use cli::Args;
