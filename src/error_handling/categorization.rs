//! Error categorization.
//!
//! Maps lookup failures onto `ErrorType` so the collector can count them.

use super::stats::ProcessingStats;
use super::types::{ErrorType, LookupError};

/// Categorizes a `reqwest::Error` into an `ErrorType`.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> ErrorType {
    if let Some(status) = error.status() {
        return categorize_status(status);
    }
    if error.is_timeout() {
        ErrorType::GeolocationTimeoutError
    } else if error.is_connect() {
        ErrorType::GeolocationConnectError
    } else if error.is_decode() {
        ErrorType::GeolocationDecodeError
    } else {
        ErrorType::GeolocationRequestError
    }
}

fn categorize_status(status: reqwest::StatusCode) -> ErrorType {
    match status.as_u16() {
        429 => ErrorType::GeolocationRateLimited,
        500..=599 => ErrorType::GeolocationServerError,
        _ => ErrorType::GeolocationClientError,
    }
}

/// Categorizes a geolocation lookup failure.
pub fn categorize_lookup_error(error: &LookupError) -> ErrorType {
    match error {
        LookupError::Request(e) => categorize_reqwest_error(e),
        LookupError::Status(status) => categorize_status(*status),
        LookupError::Decode(_) | LookupError::InvalidLocation(_) => {
            ErrorType::GeolocationDecodeError
        }
        LookupError::MissingLocation => ErrorType::GeolocationMissingLocation,
        LookupError::Url(_) => ErrorType::GeolocationRequestError,
    }
}

/// Records a lookup failure in the processing statistics.
pub fn update_error_stats(stats: &ProcessingStats, error: &LookupError) {
    stats.increment_error(categorize_lookup_error(error));
}
