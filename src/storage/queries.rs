//! Read-side queries used by the web server.

use sqlx::SqlitePool;

use crate::error_handling::DatabaseError;
use crate::storage::models::{LocatedIp, StoreStats};

/// All IPs with a geolocation, busiest first.
pub async fn located_ips(pool: &SqlitePool) -> Result<Vec<LocatedIp>, DatabaseError> {
    let rows = sqlx::query_as::<_, LocatedIp>(
        "SELECT s.ip, s.session_count, s.user_count, s.users,
                g.latitude, g.longitude, g.city, g.region, g.country, g.organization,
                s.first_seen_ms, s.last_seen_ms
         FROM session_ips s
         JOIN ip_geolocations g ON g.ip = s.ip
         ORDER BY s.session_count DESC, s.ip",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Totals over the whole store.
pub async fn store_stats(pool: &SqlitePool) -> Result<StoreStats, DatabaseError> {
    let (total_ips, total_sessions, located_ips): (i64, i64, i64) = sqlx::query_as(
        "SELECT COUNT(*),
                COALESCE(SUM(session_count), 0),
                (SELECT COUNT(*) FROM ip_geolocations)
         FROM session_ips",
    )
    .fetch_one(pool)
    .await?;

    Ok(StoreStats {
        total_ips,
        located_ips,
        pending_ips: total_ips - located_ips,
        total_sessions,
    })
}
