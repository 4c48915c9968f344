//! REST API handlers for serve mode.
//!
//! Every handler is a pure read of the shared catalog. Lookup failures map
//! to structured JSON bodies carrying the stable error kind.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use trialscope_core::{LookupError, ResourceDescriptor, Resolver, TEXT_MIME_TYPE};

use super::AppState;

/// Build the API router with all endpoints.
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .route("/resources", get(resources))
        .route("/resource", get(resource))
        .route("/schema/subset", post(schema_subset))
}

// === Request/Response types ===

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    ready: bool,
    version: &'static str,
    source: String,
    address: String,
    tables: usize,
    foreign_keys: usize,
    glossary_terms: Option<usize>,
    profiled_columns: Option<usize>,
    query_patterns: Option<usize>,
}

#[derive(Deserialize)]
struct ResourceQuery {
    uri: String,
}

#[derive(Deserialize)]
struct SubsetRequest {
    tables: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error: String,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    available_tables: Option<Vec<String>>,
}

/// A lookup failure, with the table names to suggest when the table was unknown.
struct ApiError {
    error: LookupError,
    available_tables: Option<Vec<String>>,
}

impl ApiError {
    fn new(error: LookupError, state: &AppState) -> Self {
        let available_tables = matches!(error, LookupError::UnknownTable { .. })
            .then(|| state.catalog.table_names().map(str::to_string).collect());
        Self {
            error,
            available_tables,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.error {
            LookupError::UnknownResource { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::NOT_FOUND,
        };
        let body = ErrorBody {
            error: self.error.to_string(),
            kind: self.error.kind(),
            available_tables: self.available_tables,
        };
        (status, Json(body)).into_response()
    }
}

fn text_response(text: String) -> Response {
    ([(header::CONTENT_TYPE, TEXT_MIME_TYPE)], text).into_response()
}

// === Handlers ===

/// GET /api/health - Readiness and catalog counts
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let stats = state.catalog.stats();
    Json(HealthResponse {
        status: "ok",
        ready: state.catalog.is_ready(),
        version: env!("CARGO_PKG_VERSION"),
        source: state.source.clone(),
        address: format!("{}:{}", state.config.host, state.config.port),
        tables: stats.tables,
        foreign_keys: stats.foreign_keys,
        glossary_terms: stats.glossary_terms,
        profiled_columns: stats.profiled_columns,
        query_patterns: stats.query_patterns,
    })
}

/// GET /api/resources - Resource registry
async fn resources(State(state): State<Arc<AppState>>) -> Json<Vec<ResourceDescriptor>> {
    Json(Resolver::new(&state.catalog).list())
}

/// GET /api/resource?uri=... - Resolve one resource as plain text
async fn resource(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ResourceQuery>,
) -> Result<Response, ApiError> {
    debug!(uri = %query.uri, "resource requested");
    let resolved = Resolver::new(&state.catalog)
        .resolve_uri(&query.uri)
        .map_err(|e| ApiError::new(e, &state))?;
    Ok(text_response(resolved.text))
}

/// POST /api/schema/subset - DDL for a set of tables
async fn schema_subset(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SubsetRequest>,
) -> Response {
    text_response(Resolver::new(&state.catalog).resolve_subset(&payload.tables))
}
