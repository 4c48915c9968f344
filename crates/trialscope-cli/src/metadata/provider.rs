//! Live and fallback model sources.

use tracing::{info, warn};
use trialscope_core::{LoadError, ModelBuilder, ModelSource, SchemaModel, SchemaSnapshot, StaticSource};

use super::sqlx_provider::fetch_snapshot_from_database;

/// Introspects a running database for the structural snapshot.
///
/// Descriptions, domains and cardinality classes are not stored in the
/// database catalog; they are copied from the static snapshot for tables and
/// columns of the same name. Reference documents come from the same data
/// directory.
pub struct LiveSource {
    url: String,
    reference: StaticSource,
}

impl LiveSource {
    pub fn new(url: impl Into<String>, reference: StaticSource) -> Self {
        Self {
            url: url.into(),
            reference,
        }
    }
}

impl ModelSource for LiveSource {
    fn name(&self) -> &str {
        "live"
    }

    fn load(&self) -> Result<SchemaModel, LoadError> {
        let options = self.reference.options();
        let (db_type, mut snapshot) = fetch_snapshot_from_database(&self.url, &options.schema_name)
            .map_err(|e| LoadError::Source(e.to_string()))?;

        match self.reference.read_snapshot() {
            Ok(annotated) => overlay_annotations(&mut snapshot, &annotated),
            Err(error) => warn!(%error, "no static snapshot to annotate the live schema"),
        }

        let builder = ModelBuilder::new(options.clone())
            .schema(snapshot)
            .schema_label(format!("live {} catalog", db_type.as_str()));
        self.reference.with_reference_documents(builder)?.build()
    }
}

/// Copies free-text annotations from `reference` onto matching live tables
/// and columns. Values the live catalog already carries are kept.
pub(crate) fn overlay_annotations(live: &mut SchemaSnapshot, reference: &SchemaSnapshot) {
    for table in &mut live.tables {
        let Some(annotated) = reference
            .tables
            .iter()
            .find(|t| t.table_name == table.table_name)
        else {
            continue;
        };
        table.description = table.description.take().or_else(|| annotated.description.clone());
        table.domain = table.domain.take().or_else(|| annotated.domain.clone());
        table.rows_per_study = table
            .rows_per_study
            .take()
            .or_else(|| annotated.rows_per_study.clone());

        for column in &mut table.columns {
            if column.description.is_some() {
                continue;
            }
            column.description = annotated
                .columns
                .iter()
                .find(|c| c.column_name == column.column_name)
                .and_then(|c| c.description.clone());
        }
    }
}

/// Tries `primary`, and on any load error logs a warning and uses `fallback`.
///
/// There is no retry: a failed primary is abandoned for the process lifetime.
pub struct FallbackSource<P, F> {
    primary: P,
    fallback: F,
}

impl<P: ModelSource, F: ModelSource> FallbackSource<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }

    /// Loads the model and names the source that produced it.
    pub fn load_reporting(&self) -> Result<(SchemaModel, &str), LoadError> {
        match self.primary.load() {
            Ok(model) => Ok((model, self.primary.name())),
            Err(error) => {
                warn!(
                    source = self.primary.name(),
                    fallback = self.fallback.name(),
                    %error,
                    "model source failed, falling back"
                );
                let model = self.fallback.load()?;
                info!(source = self.fallback.name(), "loaded fallback model");
                Ok((model, self.fallback.name()))
            }
        }
    }
}

impl<P: ModelSource, F: ModelSource> ModelSource for FallbackSource<P, F> {
    /// Named after the preferred source.
    fn name(&self) -> &str {
        self.primary.name()
    }

    fn load(&self) -> Result<SchemaModel, LoadError> {
        self.load_reporting().map(|(model, _)| model)
    }
}
