// storage/models.rs
// Database models and types

use serde::Serialize;

/// One IP as seen in a single collection pass.
///
/// `session_count` is the number of sessions referencing the IP in this pass
/// (always at least 1). `users` holds the distinct user identifiers, sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpObservation {
    pub ip: String,
    pub session_count: u32,
    pub users: Vec<String>,
}

/// A row of the `session_ips` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SessionIpRecord {
    pub ip: String,
    pub first_seen_ms: i64,
    pub last_seen_ms: i64,
    pub session_count: i64,
    pub user_count: i64,
    pub users: String,
}

/// A session IP joined with its geolocation, as rendered by the web server.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct LocatedIp {
    pub ip: String,
    pub session_count: i64,
    pub user_count: i64,
    pub users: String,
    pub latitude: f64,
    pub longitude: f64,
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub organization: Option<String>,
    pub first_seen_ms: i64,
    pub last_seen_ms: i64,
}

/// Aggregate counts over the whole store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub total_ips: i64,
    pub located_ips: i64,
    pub pending_ips: i64,
    pub total_sessions: i64,
}

/// Outcome of persisting one collection pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObservationSummary {
    pub new_ips: usize,
    pub updated_ips: usize,
}
