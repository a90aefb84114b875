//! Web server data structures.

use std::sync::Arc;
use std::time::Instant;

use sqlx::SqlitePool;

/// Shared state for the web server handlers.
#[derive(Clone)]
pub struct WebState {
    pub pool: SqlitePool,
    pub start_time: Arc<Instant>,
}

impl WebState {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            start_time: Arc::new(Instant::now()),
        }
    }
}
