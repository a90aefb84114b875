//! The collector process.
//!
//! Each cycle reads the identity provider's sessions, records every IP seen,
//! then geolocates the IPs that have no location yet at one request per
//! second. Cycles start every `collection_interval`; an IP whose lookup fails
//! is simply tried again in the next cycle.

mod enrichment;
#[cfg(test)]
pub(crate) mod test_support;

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use log::{error, info};
use sqlx::SqlitePool;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;

pub use enrichment::{Enricher, EnrichmentReport};

use crate::config::{CollectorConfig, GEOLOCATION_MIN_INTERVAL};
use crate::error_handling::{ErrorType, ProcessingStats};
use crate::geolocation::{Geolocator, IpInfoClient};
use crate::sessions::{aggregate_sessions, KeycloakSessionSource, SessionSource};
use crate::storage::{init_store, upsert_observations, ObservationSummary};

/// Scheduling knobs for the collector loop.
#[derive(Debug, Clone, Copy)]
pub struct CollectorSettings {
    pub collection_interval: Duration,
    pub min_distinct_users: u32,
}

/// Outcome of one collection cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// `None` when the session fetch or the write failed
    pub collection: Option<ObservationSummary>,
    /// `None` when the pending list could not be read
    pub enrichment: Option<EnrichmentReport>,
}

/// Poll-and-enrich loop over one store.
pub struct Collector<S, G> {
    pool: SqlitePool,
    source: S,
    enricher: Enricher<G>,
    settings: CollectorSettings,
    stats: ProcessingStats,
}

impl<S: SessionSource, G: Geolocator> Collector<S, G> {
    pub fn new(
        pool: SqlitePool,
        source: S,
        enricher: Enricher<G>,
        settings: CollectorSettings,
    ) -> Self {
        Self {
            pool,
            source,
            enricher,
            settings,
            stats: ProcessingStats::new(),
        }
    }

    /// Lifetime error and warning counters.
    pub fn stats(&self) -> &ProcessingStats {
        &self.stats
    }

    /// Fetches sessions and records every IP they reference.
    pub async fn collect(&self) -> Result<ObservationSummary> {
        let sessions = self
            .source
            .fetch_sessions()
            .await
            .context("Failed to fetch sessions")?;

        let aggregate = aggregate_sessions(&sessions, self.settings.min_distinct_users);
        aggregate.record_warnings(&self.stats);

        let observed_at_ms = chrono::Utc::now().timestamp_millis();
        let summary = upsert_observations(&self.pool, &aggregate.observations, observed_at_ms)
            .await
            .context("Failed to store session IPs")?;

        info!(
            "Collection complete: {} sessions, {} IPs ({} new, {} known)",
            sessions.len(),
            aggregate.observations.len(),
            summary.new_ips,
            summary.updated_ips
        );
        Ok(summary)
    }

    /// Runs one collection followed by one enrichment pass.
    ///
    /// A failed collection does not skip enrichment: IPs left over from
    /// earlier cycles still get resolved.
    pub async fn run_cycle(&self, cancel: &CancellationToken) -> CycleReport {
        info!("Starting IP data collection...");
        let collection = match self.collect().await {
            Ok(summary) => Some(summary),
            Err(e) => {
                error!("Error collecting IP data: {:#}", e);
                if e.downcast_ref::<crate::error_handling::SessionSourceError>().is_some() {
                    self.stats.increment_error(ErrorType::SessionFetchError);
                } else {
                    self.stats.increment_error(ErrorType::DatabaseWriteError);
                }
                None
            }
        };

        let enrichment = match self
            .enricher
            .enrich_pending(&self.pool, &self.stats, cancel)
            .await
        {
            Ok(report) => Some(report),
            Err(e) => {
                error!("Error reading pending geolocations: {}", e);
                None
            }
        };

        CycleReport {
            collection,
            enrichment,
        }
    }

    /// Runs cycles until `cancel` fires.
    ///
    /// Each cycle starts `collection_interval` after the previous one
    /// started; a cycle that overruns is followed immediately by the next.
    pub async fn run(&self, cancel: CancellationToken) {
        info!(
            "Scheduler started (interval {}s)",
            self.settings.collection_interval.as_secs()
        );

        loop {
            let started = Instant::now();
            self.run_cycle(&cancel).await;
            if cancel.is_cancelled() {
                break;
            }

            // An interval past the clock's range means no further cycle
            let Some(next) = started.checked_add(self.settings.collection_interval) else {
                info!("No further collection scheduled, waiting for shutdown");
                cancel.cancelled().await;
                break;
            };
            let wait = next.saturating_duration_since(Instant::now());
            info!("Next collection in {}s", wait.as_secs());

            tokio::select! {
                _ = sleep_until(next) => {}
                _ = cancel.cancelled() => break,
            }
        }

        info!("Scheduler stopped");
        self.stats.log_summary();
    }
}

/// Runs the collector process until Ctrl-C.
///
/// # Errors
///
/// Fails on invalid configuration or if the store cannot be opened.
/// Errors inside a cycle are logged and never end the loop.
pub async fn run_collector(db_path: &Path, config: CollectorConfig) -> Result<()> {
    if config.realm_id.trim().is_empty() {
        bail!("KC_REALM_ID must be set");
    }
    if config.collection_interval_secs == 0 {
        bail!("COLLECTION_INTERVAL must be at least 1 second");
    }

    let pool = init_store(db_path)
        .await
        .context("Failed to initialize database")?;

    let geolocator = IpInfoClient::new(
        &config.geolocation_base_url,
        &config.geolocation_user_agent,
        config.geolocation_timeout_secs,
        config.geolocation_token.clone(),
    )
    .context("Failed to initialize geolocation client")?;

    let source = KeycloakSessionSource::new(&config.keycloak, config.realm_id.clone());
    let settings = CollectorSettings {
        collection_interval: Duration::from_secs(config.collection_interval_secs),
        min_distinct_users: config.min_distinct_users,
    };
    let collector = Collector::new(
        pool.clone(),
        source,
        Enricher::new(geolocator, GEOLOCATION_MIN_INTERVAL),
        settings,
    );

    let cancel = CancellationToken::new();
    let ctrl_c_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl-C received, stopping after the current step");
            ctrl_c_cancel.cancel();
        }
    });

    collector.run(cancel).await;
    pool.close().await;
    Ok(())
}
