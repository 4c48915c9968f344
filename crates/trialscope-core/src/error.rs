//! Error types for catalog loading and resource lookup.
//!
//! # Error Handling Strategy
//!
//! This crate separates failures by when they can happen:
//!
//! - [`LoadError`]: Fatal errors raised while building a [`crate::SchemaModel`].
//!   A process must not start serving with a partially built model, so every
//!   referential-integrity violation is reported here, at load time.
//!
//! - [`LookupError`]: Recoverable errors raised while resolving a resource
//!   against a loaded model. They are deterministic given the request and are
//!   meant to be surfaced to the caller as a structured "not found".

use std::path::PathBuf;
use thiserror::Error;

use crate::types::ResourceKey;

/// Error raised while reading or validating input documents.
#[derive(Debug, Error)]
pub enum LoadError {
    /// A document could not be parsed or violates a model invariant.
    #[error("malformed input in {document} at `{field}`: {message}")]
    MalformedInput {
        /// Name of the offending document (file name or source label).
        document: String,
        /// Path of the offending field, e.g. `tables[2].columns[0].column_name`.
        field: String,
        /// Human-readable description of the violation.
        message: String,
    },

    /// A required document could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A model source (e.g. a live database) failed before producing documents.
    #[error("model source failed: {0}")]
    Source(String),
}

impl LoadError {
    /// Creates a [`LoadError::MalformedInput`].
    pub fn malformed(
        document: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::MalformedInput {
            document: document.into(),
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Error raised while resolving a resource against a loaded model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The requested table does not exist in the schema.
    #[error("table '{table}' not found in the schema")]
    UnknownTable { table: String },

    /// An optional collection (glossary, profiles, patterns) was never loaded.
    #[error("resource '{resource}' is unavailable: its source document was not loaded")]
    ResourceUnavailable { resource: ResourceKey },

    /// The table exists but none of its columns were profiled.
    #[error("table '{table}' has no profiled columns")]
    NoProfiles { table: String },

    /// The URI does not name any known resource.
    #[error("unknown resource '{uri}'")]
    UnknownResource { uri: String },
}

impl LookupError {
    /// Stable machine-readable kind, used by transports in error payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownTable { .. } => "unknown_table",
            Self::ResourceUnavailable { .. } => "resource_unavailable",
            Self::NoProfiles { .. } => "no_profiles",
            Self::UnknownResource { .. } => "unknown_resource",
        }
    }
}
