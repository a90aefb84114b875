//! HTTP client initialization.

use std::sync::Arc;
use std::time::Duration;

use reqwest::ClientBuilder;

/// Initializes the HTTP client used for geolocation lookups.
///
/// Creates a `reqwest::Client` configured with:
/// - The configured User-Agent (some providers reject anonymous clients)
/// - A global per-request timeout
/// - A connect timeout capped at the global timeout
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_client(
    user_agent: &str,
    timeout_seconds: u64,
) -> Result<Arc<reqwest::Client>, reqwest::Error> {
    let timeout = Duration::from_secs(timeout_seconds);
    let client = ClientBuilder::new()
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(5)))
        .user_agent(user_agent)
        .build()?;
    Ok(Arc::new(client))
}
