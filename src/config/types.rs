//! Configuration types and CLI options.
//!
//! Every option can be given on the command line or through the environment
//! variable named in its `env` attribute. `main` loads a `.env` file first, so
//! a container only needs to provide the variables.

use std::fmt;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::constants::{
    DEFAULT_COLLECTION_INTERVAL_SECS, DEFAULT_DB_PATH, DEFAULT_GEOLOCATION_BASE_URL,
    DEFAULT_GEOLOCATION_TIMEOUT_SECS, DEFAULT_KC_DB_HOST, DEFAULT_KC_DB_NAME, DEFAULT_KC_DB_PORT,
    DEFAULT_KC_DB_SCHEMA, DEFAULT_KC_DB_USER, DEFAULT_USER_AGENT, DEFAULT_WEB_HOST,
    DEFAULT_WEB_PORT,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: One JSON object per line for log shippers
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Top-level command line.
///
/// # Examples
///
/// ```bash
/// # Collector, configured from the environment
/// KC_REALM_ID=my-realm ip_heatmap collect
///
/// # Web server on a custom port
/// ip_heatmap --db-path ./ips.db serve --port 9000
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "ip_heatmap",
    about = "Geolocates identity-provider session IPs and serves a heatmap."
)]
pub struct Cli {
    /// Log level: error|warn|info|debug|trace
    #[arg(long, env = "LOG_LEVEL", value_enum, default_value_t = LogLevel::Info, global = true)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Plain, global = true)]
    pub log_format: LogFormat,

    /// SQLite database shared by the collector and the web server
    #[arg(long, env = "DB_LOCAL_PATH", default_value = DEFAULT_DB_PATH, global = true)]
    pub db_path: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

/// The two long-running processes.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Poll sessions and geolocate new IPs
    Collect(CollectorConfig),
    /// Serve the heatmap over HTTP
    Serve(WebConfig),
}

/// Connection parameters for the Keycloak PostgreSQL database.
#[derive(Clone, Args)]
pub struct KeycloakDbConfig {
    /// Database host
    #[arg(long = "kc-db-host", env = "KC_DB_HOST", default_value = DEFAULT_KC_DB_HOST)]
    pub host: String,

    /// Database port
    #[arg(long = "kc-db-port", env = "KC_DB_PORT", default_value_t = DEFAULT_KC_DB_PORT)]
    pub port: u16,

    /// Database name
    #[arg(long = "kc-db-name", env = "KC_DB_NAME", default_value = DEFAULT_KC_DB_NAME)]
    pub database: String,

    /// Database user
    #[arg(long = "kc-db-user", env = "KC_DB_USER", default_value = DEFAULT_KC_DB_USER)]
    pub user: String,

    /// Database password
    #[arg(long = "kc-db-password", env = "KC_DB_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Schema holding the Keycloak tables (sets `search_path`)
    #[arg(long = "kc-db-schema", env = "KC_DB_SCHEMA", default_value = DEFAULT_KC_DB_SCHEMA)]
    pub schema: String,
}

impl fmt::Debug for KeycloakDbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeycloakDbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("schema", &self.schema)
            .finish()
    }
}

impl Default for KeycloakDbConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_KC_DB_HOST.to_string(),
            port: DEFAULT_KC_DB_PORT,
            database: DEFAULT_KC_DB_NAME.to_string(),
            user: DEFAULT_KC_DB_USER.to_string(),
            password: None,
            schema: DEFAULT_KC_DB_SCHEMA.to_string(),
        }
    }
}

/// Collector configuration.
#[derive(Debug, Clone, Args)]
pub struct CollectorConfig {
    #[command(flatten)]
    pub keycloak: KeycloakDbConfig,

    /// Keycloak realm whose sessions are collected
    #[arg(long, env = "KC_REALM_ID")]
    pub realm_id: String,

    /// Seconds between collection cycles
    #[arg(long = "interval", env = "COLLECTION_INTERVAL", default_value_t = DEFAULT_COLLECTION_INTERVAL_SECS)]
    pub collection_interval_secs: u64,

    /// Only persist IPs shared by at least this many distinct users
    #[arg(long, env = "MIN_DISTINCT_USERS", default_value_t = 1,
          value_parser = clap::value_parser!(u32).range(1..))]
    pub min_distinct_users: u32,

    /// Base URL of the ipinfo-compatible geolocation service
    #[arg(long = "geo-base-url", env = "GEOLOCATION_BASE_URL", default_value = DEFAULT_GEOLOCATION_BASE_URL)]
    pub geolocation_base_url: String,

    /// User-Agent sent with geolocation requests
    #[arg(long = "geo-user-agent", env = "GEOLOCATION_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub geolocation_user_agent: String,

    /// Optional API token for the geolocation service
    #[arg(long = "geo-token", env = "GEOLOCATION_TOKEN", hide_env_values = true)]
    pub geolocation_token: Option<String>,

    /// Per-request geolocation timeout in seconds
    #[arg(long = "geo-timeout", env = "GEOLOCATION_TIMEOUT", default_value_t = DEFAULT_GEOLOCATION_TIMEOUT_SECS)]
    pub geolocation_timeout_secs: u64,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            keycloak: KeycloakDbConfig::default(),
            realm_id: String::new(),
            collection_interval_secs: DEFAULT_COLLECTION_INTERVAL_SECS,
            min_distinct_users: 1,
            geolocation_base_url: DEFAULT_GEOLOCATION_BASE_URL.to_string(),
            geolocation_user_agent: DEFAULT_USER_AGENT.to_string(),
            geolocation_token: None,
            geolocation_timeout_secs: DEFAULT_GEOLOCATION_TIMEOUT_SECS,
        }
    }
}

/// Web server configuration.
#[derive(Debug, Clone, Args)]
pub struct WebConfig {
    /// Address to bind
    #[arg(long, env = "WEB_HOST", default_value = DEFAULT_WEB_HOST)]
    pub host: String,

    /// Port to bind
    #[arg(long, env = "WEB_PORT", default_value_t = DEFAULT_WEB_PORT)]
    pub port: u16,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_WEB_HOST.to_string(),
            port: DEFAULT_WEB_PORT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_parse_collect_with_flags() {
        let cli = Cli::try_parse_from([
            "ip_heatmap",
            "--db-path",
            "/tmp/ips.db",
            "collect",
            "--realm-id",
            "realm-1",
            "--interval",
            "600",
            "--min-distinct-users",
            "2",
            "--geo-user-agent",
            "test-agent/1.0",
        ])
        .expect("collect arguments should parse");

        assert_eq!(cli.db_path, PathBuf::from("/tmp/ips.db"));
        match cli.command {
            Command::Collect(config) => {
                assert_eq!(config.realm_id, "realm-1");
                assert_eq!(config.collection_interval_secs, 600);
                assert_eq!(config.min_distinct_users, 2);
                assert_eq!(config.geolocation_user_agent, "test-agent/1.0");
            }
            Command::Serve(_) => panic!("expected collect subcommand"),
        }
    }

    #[test]
    fn test_parse_serve_with_port() {
        let cli = Cli::try_parse_from(["ip_heatmap", "serve", "--port", "9000"])
            .expect("serve arguments should parse");
        match cli.command {
            Command::Serve(config) => assert_eq!(config.port, 9000),
            Command::Collect(_) => panic!("expected serve subcommand"),
        }
    }

    #[test]
    fn test_min_distinct_users_rejects_zero() {
        let result = Cli::try_parse_from([
            "ip_heatmap",
            "collect",
            "--realm-id",
            "realm-1",
            "--min-distinct-users",
            "0",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_keycloak_debug_redacts_password() {
        let config = KeycloakDbConfig {
            password: Some("hunter2".to_string()),
            ..Default::default()
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_collector_config_default() {
        let config = CollectorConfig::default();
        assert_eq!(config.collection_interval_secs, 3600);
        assert_eq!(config.min_distinct_users, 1);
        assert_eq!(config.geolocation_timeout_secs, 10);
        assert_eq!(config.geolocation_base_url, "https://ipinfo.io");
    }
}
