//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (intervals, defaults, map bounds)
//! - CLI/environment option types

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Cli, CollectorConfig, Command, KeycloakDbConfig, LogFormat, LogLevel, WebConfig};
