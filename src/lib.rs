//! ip_heatmap library: session IP collection, geolocation and heatmap serving.
//!
//! Two long-running processes share one SQLite store:
//!
//! - the **collector** ([`run_collector`]) reads active sessions from the
//!   identity provider every collection interval, records each client IP,
//!   and geolocates IPs that have no location yet at one request per second;
//! - the **web server** ([`run_web_server`]) renders the located IPs as a
//!   heatmap with summary statistics.
//!
//! # Example
//!
//! ```no_run
//! use ip_heatmap::{run_web_server, WebConfig};
//! use std::path::Path;
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let config = WebConfig {
//!     port: 9000,
//!     ..Default::default()
//! };
//! run_web_server(Path::new("ip_locations.db"), config).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime.

pub mod collector;
pub mod config;
pub mod error_handling;
pub mod geolocation;
pub mod initialization;
pub mod sessions;
pub mod storage;
pub mod throttle;
pub mod web;

// Re-export public API
pub use collector::{run_collector, Collector, CollectorSettings, CycleReport, Enricher};
pub use config::{Cli, CollectorConfig, Command, LogFormat, LogLevel, WebConfig};
pub use storage::{init_store, run_migrations, StoreStats};
pub use web::run_web_server;
