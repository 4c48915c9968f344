//! Live database model sources.
//!
//! The structural snapshot is read from a running database's catalog instead
//! of the bundled JSON file. Reference documents still come from the data
//! directory, and everything flows through the same validating builder.

mod provider;
mod sqlx_provider;

pub use provider::{FallbackSource, LiveSource};
pub use sqlx_provider::{fetch_snapshot_from_database, DatabaseType, MetadataError};
