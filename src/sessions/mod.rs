//! Identity-provider sessions.
//!
//! A `SessionSource` returns the raw sessions of one realm; `aggregate_sessions`
//! turns them into one `IpObservation` per distinct client IP.

mod keycloak;

use std::collections::{BTreeMap, BTreeSet};
use std::future::Future;
use std::net::IpAddr;

pub use keycloak::KeycloakSessionSource;

use crate::config::SESSION_IP_FIELD;
use crate::error_handling::{ProcessingStats, SessionSourceError, WarningType};
use crate::storage::IpObservation;

/// One session row: who owns it and the provider's JSON blob.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct SessionRecord {
    pub user_key: String,
    pub data: Option<String>,
}

/// Reads the current sessions from the identity provider.
pub trait SessionSource {
    fn fetch_sessions(
        &self,
    ) -> impl Future<Output = Result<Vec<SessionRecord>, SessionSourceError>> + Send;
}

/// Sessions grouped by IP, plus counts of sessions that were skipped.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SessionAggregate {
    pub observations: Vec<IpObservation>,
    pub malformed_data: usize,
    pub missing_ip: usize,
    pub invalid_ip: usize,
}

impl SessionAggregate {
    /// Adds the skip counters to the collector's warning stats.
    pub fn record_warnings(&self, stats: &ProcessingStats) {
        stats.add_warnings(WarningType::MalformedSessionData, self.malformed_data);
        stats.add_warnings(WarningType::MissingSessionIp, self.missing_ip);
        stats.add_warnings(WarningType::InvalidSessionIp, self.invalid_ip);
    }
}

#[derive(Debug, PartialEq, Eq)]
enum SkipReason {
    Malformed,
    Missing,
    Invalid,
}

/// Extracts and canonicalizes the client IP from a session's JSON data.
fn extract_ip(data: &str) -> Result<IpAddr, SkipReason> {
    let value: serde_json::Value = serde_json::from_str(data).map_err(|_| SkipReason::Malformed)?;
    let raw = value
        .get(SESSION_IP_FIELD)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(SkipReason::Missing)?;
    raw.parse::<IpAddr>().map_err(|_| SkipReason::Invalid)
}

/// Groups sessions by IP.
///
/// Each observation counts every session on the IP and lists its distinct
/// users. IPs with fewer than `min_distinct_users` distinct users are dropped.
/// Output is ordered by IP string.
pub fn aggregate_sessions(sessions: &[SessionRecord], min_distinct_users: u32) -> SessionAggregate {
    let mut aggregate = SessionAggregate::default();
    let mut by_ip: BTreeMap<String, (u32, BTreeSet<String>)> = BTreeMap::new();

    for session in sessions {
        let Some(data) = session.data.as_deref() else {
            aggregate.missing_ip += 1;
            continue;
        };
        match extract_ip(data) {
            Ok(ip) => {
                let entry = by_ip.entry(ip.to_string()).or_default();
                entry.0 += 1;
                entry.1.insert(session.user_key.clone());
            }
            Err(SkipReason::Malformed) => aggregate.malformed_data += 1,
            Err(SkipReason::Missing) => aggregate.missing_ip += 1,
            Err(SkipReason::Invalid) => aggregate.invalid_ip += 1,
        }
    }

    let min_users = min_distinct_users.max(1) as usize;
    aggregate.observations = by_ip
        .into_iter()
        .filter(|(_, (_, users))| users.len() >= min_users)
        .map(|(ip, (session_count, users))| IpObservation {
            ip,
            session_count,
            users: users.into_iter().collect(),
        })
        .collect();

    aggregate
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(user: &str, data: &str) -> SessionRecord {
        SessionRecord {
            user_key: user.to_string(),
            data: Some(data.to_string()),
        }
    }

    #[test]
    fn test_extract_ip() {
        assert_eq!(
            extract_ip(r#"{"ipAddress":"192.0.2.1","authMethod":"openid-connect"}"#),
            Ok("192.0.2.1".parse().unwrap())
        );
        assert_eq!(extract_ip("not json"), Err(SkipReason::Malformed));
        assert_eq!(extract_ip(r#"{"authMethod":"x"}"#), Err(SkipReason::Missing));
        assert_eq!(extract_ip(r#"{"ipAddress":""}"#), Err(SkipReason::Missing));
        assert_eq!(extract_ip(r#"{"ipAddress":42}"#), Err(SkipReason::Missing));
        assert_eq!(
            extract_ip(r#"{"ipAddress":"999.1.1.1"}"#),
            Err(SkipReason::Invalid)
        );
    }

    #[test]
    fn test_ipv6_is_canonicalized() {
        let sessions = vec![
            session("a", r#"{"ipAddress":"2001:0db8:0000:0000:0000:0000:0000:0001"}"#),
            session("b", r#"{"ipAddress":"2001:db8::1"}"#),
        ];
        let aggregate = aggregate_sessions(&sessions, 1);
        assert_eq!(aggregate.observations.len(), 1);
        assert_eq!(aggregate.observations[0].ip, "2001:db8::1");
        assert_eq!(aggregate.observations[0].session_count, 2);
    }

    #[test]
    fn test_aggregate_counts_sessions_and_distinct_users() {
        let sessions = vec![
            session("alice@example.com", r#"{"ipAddress":"192.0.2.1"}"#),
            session("bob@example.com", r#"{"ipAddress":"192.0.2.1"}"#),
            session("alice@example.com", r#"{"ipAddress":"192.0.2.1"}"#),
            session("carol@example.com", r#"{"ipAddress":"198.51.100.2"}"#),
            session("dave@example.com", "{broken"),
            session("erin@example.com", r#"{"ipAddress":"nope"}"#),
            SessionRecord {
                user_key: "frank@example.com".to_string(),
                data: None,
            },
        ];

        let aggregate = aggregate_sessions(&sessions, 1);
        assert_eq!(
            aggregate.observations,
            vec![
                IpObservation {
                    ip: "192.0.2.1".to_string(),
                    session_count: 3,
                    users: vec![
                        "alice@example.com".to_string(),
                        "bob@example.com".to_string()
                    ],
                },
                IpObservation {
                    ip: "198.51.100.2".to_string(),
                    session_count: 1,
                    users: vec!["carol@example.com".to_string()],
                },
            ]
        );
        assert_eq!(aggregate.malformed_data, 1);
        assert_eq!(aggregate.invalid_ip, 1);
        assert_eq!(aggregate.missing_ip, 1);
    }

    #[test]
    fn test_shared_ip_filter() {
        let sessions = vec![
            session("alice", r#"{"ipAddress":"192.0.2.1"}"#),
            session("alice", r#"{"ipAddress":"192.0.2.1"}"#),
            session("alice", r#"{"ipAddress":"192.0.2.2"}"#),
            session("bob", r#"{"ipAddress":"192.0.2.2"}"#),
        ];

        let aggregate = aggregate_sessions(&sessions, 2);
        let ips: Vec<&str> = aggregate
            .observations
            .iter()
            .map(|o| o.ip.as_str())
            .collect();
        // Two sessions from one user is not a shared IP
        assert_eq!(ips, vec!["192.0.2.2"]);
    }

    #[test]
    fn test_record_warnings() {
        let stats = ProcessingStats::new();
        let aggregate = SessionAggregate {
            malformed_data: 2,
            invalid_ip: 1,
            ..Default::default()
        };
        aggregate.record_warnings(&stats);
        assert_eq!(stats.get_warning_count(WarningType::MalformedSessionData), 2);
        assert_eq!(stats.get_warning_count(WarningType::InvalidSessionIp), 1);
        assert_eq!(stats.total_warnings(), 3);
    }
}
