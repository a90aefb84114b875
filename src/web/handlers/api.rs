//! JSON handlers.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};

use super::super::types::WebState;
use super::store_error;
use crate::storage::{located_ips, store_stats};

/// `GET /api/stats`
pub async fn stats_handler(State(state): State<WebState>) -> Response {
    match store_stats(&state.pool).await {
        Ok(stats) => Json(stats).into_response(),
        Err(e) => store_error("statistics", e),
    }
}

/// `GET /api/locations`
pub async fn locations_handler(State(state): State<WebState>) -> Response {
    match located_ips(&state.pool).await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => store_error("locations", e),
    }
}
