//! Model sources: interchangeable producers of a [`SchemaModel`].

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
#[cfg(feature = "tracing")]
use tracing::debug;

use super::{parse_document, ModelBuilder};
use crate::error::LoadError;
use crate::model::{ModelOptions, SchemaModel};
use crate::types::{GlossaryDocument, PatternDocument, ProfileDocument, SchemaSnapshot};

/// Structural schema snapshot; the only required document.
pub const SCHEMA_DOCUMENT: &str = "aact_schema_static.json";
pub const GLOSSARY_DOCUMENT: &str = "glossary.json";
pub const PROFILES_DOCUMENT: &str = "column_profiles.json";
pub const PATTERNS_DOCUMENT: &str = "query_patterns.json";

/// Produces a validated [`SchemaModel`] once at startup.
///
/// Implementations differ only in where the structural snapshot comes from;
/// all of them funnel through [`ModelBuilder`].
pub trait ModelSource {
    /// Short label for logs and health output.
    fn name(&self) -> &str;

    fn load(&self) -> Result<SchemaModel, LoadError>;
}

/// Reads the bundled JSON document set from a directory.
#[derive(Debug, Clone)]
pub struct StaticSource {
    data_dir: PathBuf,
    options: ModelOptions,
}

impl StaticSource {
    pub fn new(data_dir: impl Into<PathBuf>, options: ModelOptions) -> Self {
        Self {
            data_dir: data_dir.into(),
            options,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn options(&self) -> &ModelOptions {
        &self.options
    }

    /// Reads and parses the structural snapshot without validating it.
    pub fn read_snapshot(&self) -> Result<SchemaSnapshot, LoadError> {
        read_required(&self.data_dir, SCHEMA_DOCUMENT)
    }

    /// Reads the optional reference documents into `builder`.
    ///
    /// A missing file leaves the collection unloaded; an unreadable or
    /// invalid one is an error.
    pub fn with_reference_documents(&self, builder: ModelBuilder) -> Result<ModelBuilder, LoadError> {
        Ok(builder
            .glossary(read_optional::<GlossaryDocument>(&self.data_dir, GLOSSARY_DOCUMENT)?)
            .profiles(read_optional::<ProfileDocument>(&self.data_dir, PROFILES_DOCUMENT)?)
            .patterns(read_optional::<PatternDocument>(&self.data_dir, PATTERNS_DOCUMENT)?))
    }
}

impl ModelSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    fn load(&self) -> Result<SchemaModel, LoadError> {
        let builder = ModelBuilder::new(self.options.clone()).schema(self.read_snapshot()?);
        self.with_reference_documents(builder)?.build()
    }
}

fn read_required<T: DeserializeOwned>(dir: &Path, document: &str) -> Result<T, LoadError> {
    let path = dir.join(document);
    let text = fs::read_to_string(&path).map_err(|source| LoadError::Io { path, source })?;
    parse_document(document, &text)
}

fn read_optional<T: DeserializeOwned>(dir: &Path, document: &str) -> Result<Option<T>, LoadError> {
    let path = dir.join(document);
    match fs::read_to_string(&path) {
        Ok(text) => parse_document(document, &text).map(Some),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            #[cfg(feature = "tracing")]
            debug!(path = %path.display(), "optional document not found");
            Ok(None)
        }
        Err(source) => Err(LoadError::Io { path, source }),
    }
}
