//! Shared test helpers for storage module tests.

#[cfg(test)]
use sqlx::sqlite::SqlitePoolOptions;
#[cfg(test)]
use sqlx::SqlitePool;

#[cfg(test)]
use crate::geolocation::GeoLocation;
#[cfg(test)]
use crate::storage::models::IpObservation;
#[cfg(test)]
use crate::storage::run_migrations;

/// Creates a test database pool with migrations applied.
/// Uses a single-connection in-memory database so every query sees the same data.
#[cfg(test)]
pub async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database pool");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// Builds an observation with the given sessions and users.
#[cfg(test)]
pub fn observation(ip: &str, session_count: u32, users: &[&str]) -> IpObservation {
    IpObservation {
        ip: ip.to_string(),
        session_count,
        users: users.iter().map(|u| u.to_string()).collect(),
    }
}

#[cfg(test)]
pub fn sample_location() -> GeoLocation {
    GeoLocation {
        latitude: 52.374,
        longitude: 4.8897,
        city: Some("Amsterdam".to_string()),
        region: Some("North Holland".to_string()),
        country: Some("NL".to_string()),
        organization: Some("AS64496 Example Net".to_string()),
        timezone: Some("Europe/Amsterdam".to_string()),
    }
}
