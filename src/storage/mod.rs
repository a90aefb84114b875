// storage/mod.rs
// Database operations module

pub mod geolocation;
pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
pub mod sessions;
#[cfg(test)]
pub(crate) mod test_helpers;

use std::path::Path;

use sqlx::SqlitePool;

use crate::error_handling::DatabaseError;

// Re-export commonly used items
pub use geolocation::{has_geolocation, insert_geolocation, pending_ips};
pub use migrations::run_migrations;
pub use models::{IpObservation, LocatedIp, ObservationSummary, SessionIpRecord, StoreStats};
pub use pool::init_db_pool_with_path;
pub use queries::{located_ips, store_stats};
pub use sessions::{get_session_ip, upsert_observations};

/// Opens the shared store and brings its schema up to date.
pub async fn init_store(db_path: &Path) -> Result<SqlitePool, DatabaseError> {
    let pool = init_db_pool_with_path(db_path).await?;
    run_migrations(&pool).await?;
    Ok(pool)
}
