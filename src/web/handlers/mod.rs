//! Web server HTTP handlers.

mod api;
mod assets;
mod index;
mod metrics;

pub use api::{locations_handler, stats_handler};
pub use assets::stylesheet_handler;
pub use index::{heatmap_handler, index_handler};
pub use metrics::metrics_handler;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::error_handling::DatabaseError;

/// Logs a store failure and answers 500.
fn store_error(what: &str, error: DatabaseError) -> Response {
    log::error!("Failed to load {}: {}", what, error);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("Failed to load {}", what),
    )
        .into_response()
}
