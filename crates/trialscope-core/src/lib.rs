//! Read-only schema and reference-data catalog for SQL-generating agents.
//!
//! A [`ModelSource`] produces one immutable [`SchemaModel`] at startup. A
//! [`Resolver`] then answers `aact://` resource lookups against it with
//! deterministic, token-efficient text.
//!
//! ```no_run
//! use trialscope_core::{ModelOptions, ModelSource, Resolver, StaticSource};
//!
//! let model = StaticSource::new("data", ModelOptions::default()).load()?;
//! let schema = Resolver::new(&model).resolve_uri("aact://schema/studies")?;
//! println!("{}", schema.text);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod loader;
pub mod model;
pub mod providers;
pub mod render;
pub mod resolver;
pub mod types;

pub use error::{LoadError, LookupError};
pub use loader::{
    parse_document, ModelBuilder, ModelSource, StaticSource, GLOSSARY_DOCUMENT, PATTERNS_DOCUMENT,
    PROFILES_DOCUMENT, SCHEMA_DOCUMENT,
};
pub use model::{CatalogStats, ModelOptions, ProfileSet, SchemaModel};
pub use resolver::Resolver;

pub use types::{
    // Input documents
    ColumnInput,
    ForeignKeyInput,
    GlossaryDocument,
    GlossaryMappingInput,
    GlossaryTermInput,
    Nullability,
    PatternDocument,
    PatternInput,
    ProfileDocument,
    ProfileEntryInput,
    ProfileStatsInput,
    SchemaSnapshot,
    TableInput,
    // Model entities
    Column,
    ColumnProfile,
    ColumnRef,
    ForeignKey,
    GlossaryEntry,
    GlossaryMapping,
    JoinKind,
    ProfileKind,
    QueryPattern,
    Table,
    ValueCount,
    // Resources
    ResolvedResource,
    ResourceDescriptor,
    ResourceKey,
    ResourceRequest,
    TEXT_MIME_TYPE,
    URI_SCHEME,
};
