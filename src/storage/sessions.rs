//! Session IP persistence.
//!
//! A session IP row is created on first observation and only ever grows
//! afterwards: `session_count` accumulates, `last_seen_ms` moves forward and
//! `first_seen_ms` is never touched by the update branch.

use sqlx::SqlitePool;

use crate::error_handling::DatabaseError;
use crate::storage::models::{IpObservation, ObservationSummary, SessionIpRecord};

/// Persists one collection pass in a single transaction.
///
/// Returns how many IPs were new and how many were already known.
pub async fn upsert_observations(
    pool: &SqlitePool,
    observations: &[IpObservation],
    observed_at_ms: i64,
) -> Result<ObservationSummary, DatabaseError> {
    let mut summary = ObservationSummary::default();
    if observations.is_empty() {
        return Ok(summary);
    }

    let mut tx = pool.begin().await?;

    for observation in observations {
        let session_count = i64::from(observation.session_count.max(1));
        let users = observation.users.join(", ");

        // RETURNING yields the stored count: equal to this pass's count only
        // when the row was just inserted.
        let stored_count: i64 = sqlx::query_scalar(
            "INSERT INTO session_ips (ip, first_seen_ms, last_seen_ms, session_count, user_count, users)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT(ip) DO UPDATE SET
                 session_count = session_count + excluded.session_count,
                 last_seen_ms = MAX(last_seen_ms, excluded.last_seen_ms),
                 user_count = excluded.user_count,
                 users = excluded.users
             RETURNING session_count",
        )
        .bind(&observation.ip)
        .bind(observed_at_ms)
        .bind(observed_at_ms)
        .bind(session_count)
        .bind(observation.users.len() as i64)
        .bind(&users)
        .fetch_one(&mut *tx)
        .await?;

        if stored_count == session_count {
            summary.new_ips += 1;
        } else {
            summary.updated_ips += 1;
        }
    }

    tx.commit().await?;

    Ok(summary)
}

/// Fetches a single session IP row.
pub async fn get_session_ip(
    pool: &SqlitePool,
    ip: &str,
) -> Result<Option<SessionIpRecord>, DatabaseError> {
    let record = sqlx::query_as::<_, SessionIpRecord>(
        "SELECT ip, first_seen_ms, last_seen_ms, session_count, user_count, users
         FROM session_ips WHERE ip = ?",
    )
    .bind(ip)
    .fetch_optional(pool)
    .await?;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_helpers::{create_test_pool, observation};

    #[tokio::test]
    async fn test_first_observation_inserts_row() {
        let pool = create_test_pool().await;

        let summary = upsert_observations(&pool, &[observation("192.0.2.1", 3, &["a", "b"])], 1_000)
            .await
            .expect("upsert failed");
        assert_eq!(summary.new_ips, 1);
        assert_eq!(summary.updated_ips, 0);

        let record = get_session_ip(&pool, "192.0.2.1")
            .await
            .expect("query failed")
            .expect("row should exist");
        assert_eq!(record.first_seen_ms, 1_000);
        assert_eq!(record.last_seen_ms, 1_000);
        assert_eq!(record.session_count, 3);
        assert_eq!(record.user_count, 2);
        assert_eq!(record.users, "a, b");
    }

    #[tokio::test]
    async fn test_repeat_observation_grows_count_and_keeps_first_seen() {
        let pool = create_test_pool().await;
        let ip = "2001:db8::1";

        upsert_observations(&pool, &[observation(ip, 1, &["a"])], 1_000)
            .await
            .expect("first upsert failed");

        let mut previous_count = 1;
        for (i, at) in [2_000i64, 3_000, 4_000].into_iter().enumerate() {
            let summary = upsert_observations(&pool, &[observation(ip, 1, &["a", "c"])], at)
                .await
                .expect("upsert failed");
            assert_eq!(summary.new_ips, 0, "pass {} should update", i);
            assert_eq!(summary.updated_ips, 1);

            let record = get_session_ip(&pool, ip).await.unwrap().unwrap();
            assert!(record.session_count > previous_count);
            assert_eq!(record.first_seen_ms, 1_000);
            assert_eq!(record.last_seen_ms, at);
            assert_eq!(record.users, "a, c");
            previous_count = record.session_count;
        }
    }

    #[tokio::test]
    async fn test_last_seen_never_moves_backwards() {
        let pool = create_test_pool().await;

        upsert_observations(&pool, &[observation("192.0.2.7", 1, &["a"])], 5_000)
            .await
            .unwrap();
        upsert_observations(&pool, &[observation("192.0.2.7", 1, &["a"])], 4_000)
            .await
            .unwrap();

        let record = get_session_ip(&pool, "192.0.2.7").await.unwrap().unwrap();
        assert_eq!(record.last_seen_ms, 5_000);
        assert_eq!(record.first_seen_ms, 5_000);
        assert_eq!(record.session_count, 2);
    }

    #[tokio::test]
    async fn test_empty_pass_is_noop() {
        let pool = create_test_pool().await;
        let summary = upsert_observations(&pool, &[], 1_000).await.unwrap();
        assert_eq!(summary, ObservationSummary::default());
    }
}
