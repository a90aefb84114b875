//! Prometheus metrics handler.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use super::super::types::WebState;
use super::store_error;
use crate::storage::store_stats;

/// Prometheus-compatible metrics endpoint
pub async fn metrics_handler(State(state): State<WebState>) -> Response {
    let stats = match store_stats(&state.pool).await {
        Ok(stats) => stats,
        Err(e) => return store_error("statistics", e),
    };
    let uptime = state.start_time.elapsed().as_secs_f64();

    let metrics = format!(
        r#"# HELP ip_heatmap_ips_total Session IPs recorded
# TYPE ip_heatmap_ips_total gauge
ip_heatmap_ips_total {}

# HELP ip_heatmap_located_ips Session IPs with a geolocation
# TYPE ip_heatmap_located_ips gauge
ip_heatmap_located_ips {}

# HELP ip_heatmap_pending_ips Session IPs waiting for a geolocation
# TYPE ip_heatmap_pending_ips gauge
ip_heatmap_pending_ips {}

# HELP ip_heatmap_sessions_total Sessions observed across all IPs
# TYPE ip_heatmap_sessions_total gauge
ip_heatmap_sessions_total {}

# HELP ip_heatmap_uptime_seconds Seconds since the web server started
# TYPE ip_heatmap_uptime_seconds gauge
ip_heatmap_uptime_seconds {:.0}
"#,
        stats.total_ips, stats.located_ips, stats.pending_ips, stats.total_sessions, uptime
    );

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics,
    )
        .into_response()
}
