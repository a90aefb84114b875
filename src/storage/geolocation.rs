//! Geolocation persistence.
//!
//! Geolocation rows are write-once: the insert is skipped when a row already
//! exists for the IP, and also when the IP is not a known session IP.

use sqlx::SqlitePool;

use crate::error_handling::DatabaseError;
use crate::geolocation::GeoLocation;

/// IPs without a geolocation row, oldest first.
pub async fn pending_ips(pool: &SqlitePool) -> Result<Vec<String>, DatabaseError> {
    let ips = sqlx::query_scalar(
        "SELECT s.ip FROM session_ips s
         LEFT JOIN ip_geolocations g ON g.ip = s.ip
         WHERE g.ip IS NULL
         ORDER BY s.first_seen_ms, s.ip",
    )
    .fetch_all(pool)
    .await?;
    Ok(ips)
}

/// Whether `ip` already has a geolocation row.
pub async fn has_geolocation(pool: &SqlitePool, ip: &str) -> Result<bool, DatabaseError> {
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM ip_geolocations WHERE ip = ?)")
            .bind(ip)
            .fetch_one(pool)
            .await?;
    Ok(exists)
}

/// Stores the geolocation for `ip`.
///
/// Returns `true` if a row was written, `false` if the IP was already
/// resolved or is not a known session IP.
pub async fn insert_geolocation(
    pool: &SqlitePool,
    ip: &str,
    location: &GeoLocation,
    provider: &str,
    fetched_at_ms: i64,
) -> Result<bool, DatabaseError> {
    let result = sqlx::query(
        "INSERT INTO ip_geolocations (
            ip, latitude, longitude, city, region, country, organization,
            timezone, provider, fetched_at_ms
        )
        SELECT ?, ?, ?, ?, ?, ?, ?, ?, ?, ?
        WHERE EXISTS (SELECT 1 FROM session_ips WHERE ip = ?)
        ON CONFLICT(ip) DO NOTHING",
    )
    .bind(ip)
    .bind(location.latitude)
    .bind(location.longitude)
    .bind(&location.city)
    .bind(&location.region)
    .bind(&location.country)
    .bind(&location.organization)
    .bind(&location.timezone)
    .bind(provider)
    .bind(fetched_at_ms)
    .bind(ip)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}
