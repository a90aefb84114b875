//! HTML page and SVG image handlers.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};

use super::super::render::{render_heatmap_svg, render_index, render_no_data};
use super::super::types::WebState;
use super::store_error;
use crate::storage::{located_ips, store_stats};

/// Heatmap page with statistics
pub async fn index_handler(State(state): State<WebState>) -> Response {
    let rows = match located_ips(&state.pool).await {
        Ok(rows) => rows,
        Err(e) => return store_error("locations", e),
    };
    let stats = match store_stats(&state.pool).await {
        Ok(stats) => stats,
        Err(e) => return store_error("statistics", e),
    };

    if rows.is_empty() {
        return Html(render_no_data(&stats)).into_response();
    }
    Html(render_index(&stats, &rows)).into_response()
}

/// Heatmap as a standalone SVG image
pub async fn heatmap_handler(State(state): State<WebState>) -> Response {
    match located_ips(&state.pool).await {
        Ok(rows) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "image/svg+xml")],
            render_heatmap_svg(&rows),
        )
            .into_response(),
        Err(e) => store_error("locations", e),
    }
}
