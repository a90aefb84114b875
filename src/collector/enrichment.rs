//! Rate-limited geolocation of pending IPs.

use log::{debug, info, warn};
use sqlx::SqlitePool;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::error_handling::{update_error_stats, DatabaseError, ErrorType, ProcessingStats};
use crate::geolocation::Geolocator;
use crate::storage::{has_geolocation, insert_geolocation, pending_ips};
use crate::throttle::Throttle;

/// Outcome of one enrichment pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichmentReport {
    /// IPs without a geolocation when the pass started
    pub pending: usize,
    /// IPs resolved and stored by this pass
    pub resolved: usize,
    /// Lookups or writes that failed; these IPs stay pending
    pub failed: usize,
    /// IPs found already resolved before their lookup
    pub skipped: usize,
}

/// Resolves pending IPs one at a time through a `Geolocator`.
///
/// The throttle lives as long as the enricher, so the request spacing holds
/// across passes as well as within one.
pub struct Enricher<G> {
    geolocator: G,
    throttle: Throttle,
}

impl<G: Geolocator> Enricher<G> {
    pub fn new(geolocator: G, min_interval: Duration) -> Self {
        Self {
            geolocator,
            throttle: Throttle::new(min_interval),
        }
    }

    pub fn geolocator(&self) -> &G {
        &self.geolocator
    }

    /// Looks up every IP that has no geolocation yet.
    ///
    /// Failures are counted and logged; the IP is left for the next pass.
    /// Cancellation is checked between IPs, never during a request.
    ///
    /// # Errors
    ///
    /// Only a failure to read the pending list aborts the pass.
    pub async fn enrich_pending(
        &self,
        pool: &SqlitePool,
        stats: &ProcessingStats,
        cancel: &CancellationToken,
    ) -> Result<EnrichmentReport, DatabaseError> {
        let pending = pending_ips(pool).await?;
        let mut report = EnrichmentReport {
            pending: pending.len(),
            ..Default::default()
        };

        if pending.is_empty() {
            info!("No pending geolocations");
            return Ok(report);
        }

        info!(
            "Processing {} pending geolocations (one every {:?})...",
            pending.len(),
            self.throttle.min_interval()
        );

        for (i, ip) in pending.iter().enumerate() {
            if cancel.is_cancelled() {
                info!("Enrichment interrupted after {}/{} IPs", i, pending.len());
                break;
            }

            match has_geolocation(pool, ip).await {
                Ok(true) => {
                    debug!("{} already resolved, skipping", ip);
                    report.skipped += 1;
                    continue;
                }
                Ok(false) => {}
                Err(e) => {
                    warn!("Could not check {}: {}", ip, e);
                    stats.increment_error(ErrorType::DatabaseWriteError);
                    report.failed += 1;
                    continue;
                }
            }

            self.throttle.acquire().await;
            debug!("Fetching {} ({}/{})", ip, i + 1, pending.len());

            let location = match self.geolocator.locate(ip).await {
                Ok(location) => location,
                Err(e) => {
                    update_error_stats(stats, &e);
                    warn!("✗ {} -> {}", ip, e);
                    report.failed += 1;
                    continue;
                }
            };

            let fetched_at_ms = chrono::Utc::now().timestamp_millis();
            match insert_geolocation(
                pool,
                ip,
                &location,
                self.geolocator.provider(),
                fetched_at_ms,
            )
            .await
            {
                Ok(true) => {
                    info!(
                        "✓ {} -> ({}, {})",
                        ip, location.latitude, location.longitude
                    );
                    report.resolved += 1;
                }
                Ok(false) => {
                    debug!("{} was resolved concurrently, result discarded", ip);
                    report.skipped += 1;
                }
                Err(e) => {
                    warn!("Failed to store geolocation for {}: {}", ip, e);
                    stats.increment_error(ErrorType::DatabaseWriteError);
                    report.failed += 1;
                }
            }
        }

        info!(
            "Geolocation pass complete: {} resolved, {} failed, {} skipped",
            report.resolved, report.failed, report.skipped
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::test_support::FakeGeolocator;
    use crate::storage::test_helpers::{create_test_pool, observation};
    use crate::storage::{store_stats, upsert_observations};

    const INTERVAL: Duration = Duration::from_millis(50);

    #[tokio::test]
    async fn test_resolves_all_pending_once() {
        let pool = create_test_pool().await;
        upsert_observations(
            &pool,
            &[
                observation("192.0.2.1", 1, &["a"]),
                observation("192.0.2.2", 1, &["b"]),
            ],
            1_000,
        )
        .await
        .unwrap();

        let enricher = Enricher::new(FakeGeolocator::default(), INTERVAL);
        let stats = ProcessingStats::new();
        let cancel = CancellationToken::new();

        let report = enricher.enrich_pending(&pool, &stats, &cancel).await.unwrap();
        assert_eq!(report.pending, 2);
        assert_eq!(report.resolved, 2);
        assert_eq!(report.failed, 0);

        // Second pass has nothing to do and makes no requests
        let report = enricher.enrich_pending(&pool, &stats, &cancel).await.unwrap();
        assert_eq!(report, EnrichmentReport::default());
        assert_eq!(enricher.geolocator.call_count(), 2);
    }

    #[tokio::test]
    async fn test_failed_lookup_stays_pending() {
        let pool = create_test_pool().await;
        upsert_observations(
            &pool,
            &[
                observation("192.0.2.1", 1, &["a"]),
                observation("192.0.2.9", 1, &["b"]),
            ],
            1_000,
        )
        .await
        .unwrap();

        let enricher = Enricher::new(FakeGeolocator::failing_for(&["192.0.2.9"]), INTERVAL);
        let stats = ProcessingStats::new();
        let cancel = CancellationToken::new();

        let report = enricher.enrich_pending(&pool, &stats, &cancel).await.unwrap();
        assert_eq!(report.resolved, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(
            stats.get_error_count(ErrorType::GeolocationMissingLocation),
            1
        );
        assert_eq!(
            pending_ips(&pool).await.unwrap(),
            vec!["192.0.2.9".to_string()]
        );

        // Only the failed IP is retried on the next pass
        enricher.enrich_pending(&pool, &stats, &cancel).await.unwrap();
        assert_eq!(enricher.geolocator.calls_for("192.0.2.1"), 1);
        assert_eq!(enricher.geolocator.calls_for("192.0.2.9"), 2);
        assert_eq!(store_stats(&pool).await.unwrap().located_ips, 1);
    }

    #[tokio::test]
    async fn test_requests_are_spaced_by_interval() {
        let pool = create_test_pool().await;
        let ips: Vec<String> = (1..=4).map(|i| format!("192.0.2.{}", i)).collect();
        let observations: Vec<_> = ips.iter().map(|ip| observation(ip, 1, &["a"])).collect();
        upsert_observations(&pool, &observations, 1_000).await.unwrap();

        let enricher = Enricher::new(FakeGeolocator::default(), INTERVAL);
        let stats = ProcessingStats::new();
        enricher
            .enrich_pending(&pool, &stats, &CancellationToken::new())
            .await
            .unwrap();

        // Stamps are taken inside the fake, a hair after the throttle slot
        let slack = Duration::from_millis(1);
        let stamps = enricher.geolocator.call_times();
        assert_eq!(stamps.len(), 4);
        for pair in stamps.windows(2) {
            assert!(
                pair[1].duration_since(pair[0]) + slack >= INTERVAL,
                "requests {:?} apart",
                pair[1].duration_since(pair[0])
            );
        }
    }

    #[tokio::test]
    async fn test_cancelled_pass_makes_no_requests() {
        let pool = create_test_pool().await;
        upsert_observations(&pool, &[observation("192.0.2.1", 1, &["a"])], 1_000)
            .await
            .unwrap();

        let enricher = Enricher::new(FakeGeolocator::default(), INTERVAL);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let report = enricher
            .enrich_pending(&pool, &ProcessingStats::new(), &cancel)
            .await
            .unwrap();
        assert_eq!(report.pending, 1);
        assert_eq!(report.resolved, 0);
        assert_eq!(enricher.geolocator.call_count(), 0);
    }
}
