// Shared test helpers for database setup and test data creation.
//
// This module provides common utilities used across multiple test files to reduce duplication.

#![allow(dead_code)] // Each test file uses a different subset

use std::sync::{Arc, Mutex};

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use ip_heatmap::error_handling::SessionSourceError;
use ip_heatmap::geolocation::GeoLocation;
use ip_heatmap::run_migrations;
use ip_heatmap::sessions::{SessionRecord, SessionSource};
use ip_heatmap::storage::IpObservation;

/// Creates a test database pool with migrations applied.
/// Uses a single-connection in-memory database for fast test execution.
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

pub fn observation(ip: &str, session_count: u32, users: &[&str]) -> IpObservation {
    IpObservation {
        ip: ip.to_string(),
        session_count,
        users: users.iter().map(|u| u.to_string()).collect(),
    }
}

pub fn location(latitude: f64, longitude: f64, city: &str) -> GeoLocation {
    GeoLocation {
        latitude,
        longitude,
        city: Some(city.to_string()),
        region: None,
        country: Some("NL".to_string()),
        organization: None,
        timezone: None,
    }
}

pub fn session(user: &str, ip: &str) -> SessionRecord {
    SessionRecord {
        user_key: user.to_string(),
        data: Some(format!(r#"{{"ipAddress":"{}","authMethod":"openid-connect"}}"#, ip)),
    }
}

/// Session source that returns the same sessions on every fetch.
///
/// Clones share the session list, so a test can keep a handle and change
/// what the collector sees between cycles.
#[derive(Clone, Default)]
pub struct StaticSource {
    sessions: Arc<Mutex<Vec<SessionRecord>>>,
}

impl StaticSource {
    pub fn new(sessions: Vec<SessionRecord>) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(sessions)),
        }
    }

    /// Replaces the sessions returned by later fetches.
    pub fn set(&self, sessions: Vec<SessionRecord>) {
        *self.sessions.lock().unwrap() = sessions;
    }
}

impl SessionSource for StaticSource {
    async fn fetch_sessions(&self) -> Result<Vec<SessionRecord>, SessionSourceError> {
        Ok(self.sessions.lock().unwrap().clone())
    }
}
