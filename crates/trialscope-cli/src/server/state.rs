//! Shared application state for the server.
//!
//! The catalog is loaded before the server starts and never changes, so
//! handlers share it through `Arc` without locks.

use std::sync::Arc;

use trialscope_core::SchemaModel;

use crate::catalog::Catalog;

/// Server configuration derived from CLI arguments.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

/// Shared application state.
pub struct AppState {
    /// Server configuration
    pub config: ServerConfig,
    /// The loaded, immutable model
    pub catalog: Arc<SchemaModel>,
    /// Which model source produced the catalog
    pub source: String,
}

impl AppState {
    pub fn new(config: ServerConfig, catalog: Catalog) -> Self {
        Self {
            config,
            catalog: Arc::new(catalog.model),
            source: catalog.source,
        }
    }
}
