//! HTTP server for the heatmap.
//!
//! Endpoints:
//! - `/` - heatmap page with statistics and the table of located IPs
//! - `/heatmap.svg` - the heatmap image alone
//! - `/api/stats`, `/api/locations` - the same data as JSON
//! - `/metrics` - Prometheus-compatible metrics
//!
//! The server only reads the store; the collector process writes it.

mod handlers;
mod render;
mod types;

use std::path::Path;

use anyhow::{Context, Result};
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;

use handlers::{
    heatmap_handler, index_handler, locations_handler, metrics_handler, stats_handler,
    stylesheet_handler,
};
pub use render::{escape_html, marker_radius, project, render_heatmap_svg};
pub use types::WebState;

use crate::config::WebConfig;
use crate::storage::init_store;

/// Builds the router over `state`.
pub fn build_router(state: WebState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/heatmap.svg", get(heatmap_handler))
        .route("/api/stats", get(stats_handler))
        .route("/api/locations", get(locations_handler))
        .route("/metrics", get(metrics_handler))
        .route("/static/style.css", get(stylesheet_handler))
        .with_state(state)
}

/// Serves on an already-bound listener until Ctrl-C.
pub async fn serve(listener: TcpListener, state: WebState) -> Result<()> {
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            log::info!("Ctrl-C received, shutting down web server");
        })
        .await
        .context("Web server error")
}

/// Runs the web server process.
pub async fn run_web_server(db_path: &Path, config: WebConfig) -> Result<()> {
    let pool = init_store(db_path)
        .await
        .context("Failed to initialize database")?;

    let address = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind web server to {}", address))?;

    log::info!("Web server listening on http://{}/", address);
    log::info!("  - Stats: http://{}/api/stats", address);
    log::info!("  - Metrics: http://{}/metrics", address);

    serve(listener, WebState::new(pool)).await
}
