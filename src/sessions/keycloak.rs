//! Keycloak session source.
//!
//! Reads offline user sessions straight from the Keycloak PostgreSQL database.

use std::time::Duration;

use log::debug;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

use super::{SessionRecord, SessionSource};
use crate::config::{KeycloakDbConfig, KC_DB_MAX_CONNECTIONS};
use crate::error_handling::SessionSourceError;

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

const SESSIONS_QUERY: &str = "SELECT COALESCE(u.email, u.username) AS user_key, s.data
     FROM offline_user_session s
     JOIN user_entity u ON s.user_id = u.id
     WHERE s.realm_id = $1";

/// Session source backed by the Keycloak database.
///
/// The pool connects lazily, so an unreachable database only fails the
/// collection cycle that tried to use it.
pub struct KeycloakSessionSource {
    pool: PgPool,
    realm_id: String,
}

impl KeycloakSessionSource {
    pub fn new(config: &KeycloakDbConfig, realm_id: impl Into<String>) -> Self {
        let mut options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.database)
            .username(&config.user)
            .options([("search_path", config.schema.as_str())]);
        if let Some(password) = &config.password {
            options = options.password(password);
        }

        let pool = PgPoolOptions::new()
            .max_connections(KC_DB_MAX_CONNECTIONS)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_lazy_with(options);

        Self {
            pool,
            realm_id: realm_id.into(),
        }
    }
}

impl SessionSource for KeycloakSessionSource {
    async fn fetch_sessions(&self) -> Result<Vec<SessionRecord>, SessionSourceError> {
        let sessions = sqlx::query_as::<_, SessionRecord>(SESSIONS_QUERY)
            .bind(&self.realm_id)
            .fetch_all(&self.pool)
            .await?;
        debug!(
            "Fetched {} sessions for realm {}",
            sessions.len(),
            self.realm_id
        );
        Ok(sessions)
    }
}
