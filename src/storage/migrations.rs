// storage/migrations.rs
// Database migration management

use log::warn;
use sqlx::migrate::MigrateError;
use sqlx::SqlitePool;

use crate::error_handling::DatabaseError;

/// Attempts before a lost race with the other process is reported as an error.
const MIGRATION_ATTEMPTS: u32 = 3;

// SQLite extended result codes
const SQLITE_BUSY: &str = "5";
const SQLITE_BUSY_SNAPSHOT: &str = "517";

/// Runs the SQLx migrations embedded from the `migrations/` directory.
///
/// Both processes call this on startup and may do so at the same moment on a
/// fresh file. SQLite has no migration lock, so the slower process can find
/// its `_sqlx_migrations` row already written by the other one. The schema is
/// complete at that point, and running the migrator again only verifies it.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DatabaseError> {
    let mut attempt = 1;
    loop {
        match sqlx::migrate!("./migrations").run(pool).await {
            Ok(()) => return Ok(()),
            Err(e) if attempt < MIGRATION_ATTEMPTS && lost_migration_race(&e) => {
                warn!("Schema migration raced with another process ({e}), re-checking");
                attempt += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// True when another migrator applied (or is applying) the same version.
fn lost_migration_race(error: &MigrateError) -> bool {
    let sql_error = match error {
        MigrateError::Execute(e) | MigrateError::ExecuteMigration(e, _) => e,
        _ => return false,
    };
    match sql_error {
        sqlx::Error::Database(db) => {
            db.is_unique_violation()
                || matches!(
                    db.code().as_deref(),
                    Some(SQLITE_BUSY) | Some(SQLITE_BUSY_SNAPSHOT)
                )
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_are_not_races() {
        assert!(!lost_migration_race(&MigrateError::VersionMissing(1)));
        assert!(!lost_migration_race(&MigrateError::Execute(
            sqlx::Error::PoolTimedOut
        )));
    }

    #[tokio::test]
    async fn test_rerun_on_migrated_pool_is_noop() {
        let pool = crate::storage::test_helpers::create_test_pool().await;
        run_migrations(&pool).await.expect("second run should succeed");

        let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(applied, 2);
    }
}
