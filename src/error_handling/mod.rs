//! Error handling and processing statistics.
//!
//! This module provides:
//! - Error type definitions (`thiserror`)
//! - Processing statistics tracking (errors and warnings)
//! - Categorization of geolocation failures

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::{categorize_lookup_error, categorize_reqwest_error, update_error_stats};
pub use stats::ProcessingStats;
pub use types::{
    DatabaseError, ErrorType, InitializationError, LookupError, SessionSourceError, WarningType,
};
