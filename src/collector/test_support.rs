//! Test doubles for the collector's seams.

use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Instant;

use crate::error_handling::{LookupError, SessionSourceError};
use crate::geolocation::{GeoLocation, Geolocator};
use crate::sessions::{SessionRecord, SessionSource};

/// Geolocator that answers from memory and records every call.
#[derive(Default)]
pub struct FakeGeolocator {
    failing: HashSet<String>,
    calls: Mutex<Vec<(String, Instant)>>,
}

impl FakeGeolocator {
    /// Lookups for these IPs fail with `MissingLocation`.
    pub fn failing_for(ips: &[&str]) -> Self {
        Self {
            failing: ips.iter().map(|ip| ip.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls_for(&self, ip: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(called, _)| called == ip)
            .count()
    }

    pub fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().iter().map(|(_, t)| *t).collect()
    }
}

impl Geolocator for FakeGeolocator {
    fn provider(&self) -> &str {
        "fake"
    }

    async fn locate(&self, ip: &str) -> Result<GeoLocation, LookupError> {
        self.calls
            .lock()
            .unwrap()
            .push((ip.to_string(), Instant::now()));
        if self.failing.contains(ip) {
            return Err(LookupError::MissingLocation);
        }
        let last_octet = ip
            .rsplit('.')
            .next()
            .and_then(|o| o.parse::<f64>().ok())
            .unwrap_or(0.0);
        Ok(GeoLocation {
            latitude: last_octet / 10.0,
            longitude: -last_octet / 10.0,
            city: Some(format!("City {}", ip)),
            region: None,
            country: Some("NL".to_string()),
            organization: None,
            timezone: None,
        })
    }
}

/// Session source that replays a scripted list of passes.
///
/// Each `fetch_sessions` call returns the next pass; once the script is
/// exhausted the last pass repeats. `None` entries fail the fetch.
pub struct ScriptedSource {
    passes: Vec<Option<Vec<SessionRecord>>>,
    cursor: Mutex<usize>,
}

impl ScriptedSource {
    pub fn new(passes: Vec<Option<Vec<SessionRecord>>>) -> Self {
        Self {
            passes,
            cursor: Mutex::new(0),
        }
    }
}

impl SessionSource for ScriptedSource {
    async fn fetch_sessions(&self) -> Result<Vec<SessionRecord>, SessionSourceError> {
        let index = {
            let mut cursor = self.cursor.lock().unwrap();
            let index = (*cursor).min(self.passes.len().saturating_sub(1));
            *cursor += 1;
            index
        };
        match self.passes.get(index).cloned().flatten() {
            Some(sessions) => Ok(sessions),
            None => Err(SessionSourceError::Query(sqlx::Error::PoolTimedOut)),
        }
    }
}

pub fn session(user: &str, ip: &str) -> SessionRecord {
    SessionRecord {
        user_key: user.to_string(),
        data: Some(format!(r#"{{"ipAddress":"{}"}}"#, ip)),
    }
}
