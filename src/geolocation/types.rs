//! Geolocation data structures.

use serde::{Deserialize, Serialize};

/// Result of a successful lookup.
///
/// Coordinates are always present; everything else is whatever the provider
/// returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub organization: Option<String>,
    pub timezone: Option<String>,
}

/// Wire format of an ipinfo-style `/{ip}/json` response.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct IpInfoResponse {
    pub loc: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub org: Option<String>,
    pub timezone: Option<String>,
}
