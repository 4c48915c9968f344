//! HTTP server module for serve mode.
//!
//! Exposes the loaded catalog over a small local REST API. The model is
//! loaded before the server binds and is shared read-only by all handlers.

pub mod api;
pub mod state;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::info;

use crate::catalog::Catalog;
pub use state::{AppState, ServerConfig};

/// Upper bound on request bodies; subset requests only carry a table list.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Run the HTTP server until Ctrl+C.
pub async fn run_server(config: ServerConfig, catalog: Catalog) -> Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(AppState::new(config.clone(), catalog));
    let app = build_router(state, config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    info!(%addr, "server listening");
    println!("trialscope: server listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    println!("\ntrialscope: server stopped");
    Ok(())
}

/// Build the main router with all routes.
pub fn build_router(state: Arc<AppState>, port: u16) -> Router {
    // Only pages served from this machine may read responses.
    let allowed_origins: Vec<HeaderValue> = [
        format!("http://localhost:{port}"),
        format!("http://127.0.0.1:{port}"),
    ]
    .iter()
    .filter_map(|origin| origin.parse().ok())
    .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .nest("/api", api::api_routes())
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(cors)
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
}
