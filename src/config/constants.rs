//! Configuration constants.

use std::time::Duration;

/// Default SQLite database path shared by the collector and the web server.
pub const DEFAULT_DB_PATH: &str = "ip_locations.db";

/// Default seconds between collection cycles (hourly).
pub const DEFAULT_COLLECTION_INTERVAL_SECS: u64 = 3600;

/// Minimum spacing between two geolocation requests.
///
/// The upstream provider's terms allow one lookup per second. This is not
/// exposed as a CLI option.
pub const GEOLOCATION_MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Default geolocation provider (ipinfo-compatible `/{ip}/json` endpoint).
pub const DEFAULT_GEOLOCATION_BASE_URL: &str = "https://ipinfo.io";

/// Default per-request timeout for geolocation lookups, in seconds.
pub const DEFAULT_GEOLOCATION_TIMEOUT_SECS: u64 = 10;

/// Default User-Agent sent with geolocation requests.
pub const DEFAULT_USER_AGENT: &str = concat!("ip_heatmap/", env!("CARGO_PKG_VERSION"));

/// Default web server bind address.
pub const DEFAULT_WEB_HOST: &str = "0.0.0.0";

/// Default web server port.
pub const DEFAULT_WEB_PORT: u16 = 8000;

// Keycloak database defaults
pub const DEFAULT_KC_DB_HOST: &str = "localhost";
pub const DEFAULT_KC_DB_PORT: u16 = 5432;
pub const DEFAULT_KC_DB_NAME: &str = "keycloak";
pub const DEFAULT_KC_DB_USER: &str = "keycloak";
pub const DEFAULT_KC_DB_SCHEMA: &str = "public";

/// Connections kept open to the identity-provider database.
pub const KC_DB_MAX_CONNECTIONS: u32 = 2;

/// JSON key holding the client address in a Keycloak session's `data` column.
pub const SESSION_IP_FIELD: &str = "ipAddress";

// Heatmap projection bounds (degrees)
pub const MAP_MIN_LON: f64 = -180.0;
pub const MAP_MAX_LON: f64 = 180.0;
pub const MAP_MIN_LAT: f64 = -60.0;
pub const MAP_MAX_LAT: f64 = 80.0;

// Heatmap marker sizing, in squared points like a scatter plot's `s`
pub const MARKER_SIZE_FACTOR: f64 = 50.0;
pub const MARKER_MIN_SIZE: f64 = 50.0;
pub const MARKER_MAX_SIZE: f64 = 500.0;
