//! Error type definitions.
//!
//! This module defines all error and warning types used throughout the application.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use reqwest::StatusCode;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// The geolocation base URL could not be parsed.
    #[error("Invalid geolocation base URL: {0}")]
    BaseUrlError(#[from] url::ParseError),
}

/// Error types for database operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),

    /// Schema migration error.
    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),
}

/// Errors raised while reading sessions from the identity provider.
#[derive(Error, Debug)]
pub enum SessionSourceError {
    /// The provider database query failed (includes connection failures).
    #[error("Session query failed: {0}")]
    Query(#[from] sqlx::Error),
}

/// Errors raised by a single geolocation lookup.
///
/// Every variant leaves the IP unresolved until the next cycle.
#[derive(Error, Debug)]
pub enum LookupError {
    /// Transport-level failure (timeout, connect, body read).
    #[error("Geolocation request failed: {0}")]
    Request(#[from] ReqwestError),

    /// The service answered with a non-success status.
    #[error("Geolocation service returned HTTP {0}")]
    Status(StatusCode),

    /// The body was not the expected JSON document.
    #[error("Geolocation response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),

    /// The body had no `loc` field (reserved/bogon addresses do this).
    #[error("Geolocation response has no location")]
    MissingLocation,

    /// The `loc` field was not a valid `"lat,lon"` pair.
    #[error("Geolocation response has malformed location {0:?}")]
    InvalidLocation(String),

    /// The request URL could not be built for this IP.
    #[error("Invalid geolocation request URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Types of errors that can occur during a collection cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    // Identity provider
    SessionFetchError,
    // Geolocation HTTP errors
    GeolocationRateLimited,   // 429 Too Many Requests
    GeolocationClientError,   // other 4xx
    GeolocationServerError,   // 5xx
    GeolocationTimeoutError,
    GeolocationConnectError,
    GeolocationRequestError,
    // Geolocation payload errors
    GeolocationDecodeError,
    GeolocationMissingLocation,
    // Storage
    DatabaseWriteError,
}

/// Types of warnings that can occur while reading sessions.
///
/// Warnings mark sessions that were skipped without failing the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum WarningType {
    MalformedSessionData, // `data` column is not JSON
    MissingSessionIp,     // no `ipAddress` field
    InvalidSessionIp,     // `ipAddress` is not an IPv4/IPv6 address
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::SessionFetchError => "Session fetch error",
            ErrorType::GeolocationRateLimited => "Geolocation rate limited (429)",
            ErrorType::GeolocationClientError => "Geolocation client error (4xx)",
            ErrorType::GeolocationServerError => "Geolocation server error (5xx)",
            ErrorType::GeolocationTimeoutError => "Geolocation timeout",
            ErrorType::GeolocationConnectError => "Geolocation connect error",
            ErrorType::GeolocationRequestError => "Geolocation request error",
            ErrorType::GeolocationDecodeError => "Geolocation decode error",
            ErrorType::GeolocationMissingLocation => "Geolocation missing location",
            ErrorType::DatabaseWriteError => "Database write error",
        }
    }
}

impl WarningType {
    /// Returns a human-readable string representation of the warning type.
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningType::MalformedSessionData => "Malformed session data",
            WarningType::MissingSessionIp => "Session without IP address",
            WarningType::InvalidSessionIp => "Invalid session IP address",
        }
    }
}
