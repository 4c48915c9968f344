//! Startup model loading.

use anyhow::{Context, Result};
use tracing::info;
use trialscope_core::{ModelSource, SchemaModel, StaticSource};

use crate::cli::Args;

/// The loaded model and the name of the source that produced it.
#[derive(Debug)]
pub struct Catalog {
    pub model: SchemaModel,
    pub source: String,
}

/// Loads the model once, from the live database when `--metadata-url` is
/// given (falling back to the data directory), otherwise from the data
/// directory alone.
pub fn load_catalog(args: &Args) -> Result<Catalog> {
    let static_source = StaticSource::new(&args.data_dir, args.model_options());

    #[cfg(feature = "metadata-provider")]
    if let Some(ref url) = args.metadata_url {
        use crate::metadata::{FallbackSource, LiveSource};

        // Warn if credentials appear to be embedded in the URL
        if url.contains('@') && !url.starts_with("sqlite") && !args.quiet {
            eprintln!(
                "trialscope: warning: Database credentials in --metadata-url may be logged in shell history. \
                 Consider AACT_DATABASE_URL or a .pgpass file instead."
            );
        }

        let live = LiveSource::new(url.clone(), static_source.clone());
        let source = FallbackSource::new(live, static_source);
        let (model, used) = source
            .load_reporting()
            .with_context(|| format!("Failed to load schema catalog from {}", args.data_dir.display()))?;
        return Ok(finish(model, used));
    }

    let model = static_source
        .load()
        .with_context(|| format!("Failed to load schema catalog from {}", args.data_dir.display()))?;
    Ok(finish(model, static_source.name()))
}

fn finish(model: SchemaModel, source: &str) -> Catalog {
    let stats = model.stats();
    info!(
        source,
        tables = stats.tables,
        foreign_keys = stats.foreign_keys,
        "catalog ready"
    );
    Catalog {
        model,
        source: source.to_string(),
    }
}
