//! Processing statistics tracking.
//!
//! Thread-safe counters for errors and warnings seen by the collector over
//! its lifetime.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::{ErrorType, WarningType};

/// Thread-safe processing statistics tracker.
///
/// Every `ErrorType` and `WarningType` is initialized to zero on creation.
pub struct ProcessingStats {
    errors: HashMap<ErrorType, AtomicUsize>,
    warnings: HashMap<WarningType, AtomicUsize>,
}

impl ProcessingStats {
    pub fn new() -> Self {
        let mut errors = HashMap::new();
        for error in ErrorType::iter() {
            errors.insert(error, AtomicUsize::new(0));
        }

        let mut warnings = HashMap::new();
        for warning in WarningType::iter() {
            warnings.insert(warning, AtomicUsize::new(0));
        }

        ProcessingStats { errors, warnings }
    }

    /// Increment an error counter.
    pub fn increment_error(&self, error: ErrorType) {
        if let Some(counter) = self.errors.get(&error) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment error counter for {:?} which is not in the map",
                error
            );
        }
    }

    /// Add `count` to a warning counter.
    pub fn add_warnings(&self, warning: WarningType, count: usize) {
        if count == 0 {
            return;
        }
        if let Some(counter) = self.warnings.get(&warning) {
            counter.fetch_add(count, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment warning counter for {:?} which is not in the map",
                warning
            );
        }
    }

    pub fn get_error_count(&self, error: ErrorType) -> usize {
        self.errors
            .get(&error)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    pub fn get_warning_count(&self, warning: WarningType) -> usize {
        self.warnings
            .get(&warning)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    pub fn total_errors(&self) -> usize {
        self.errors.values().map(|c| c.load(Ordering::Relaxed)).sum()
    }

    pub fn total_warnings(&self) -> usize {
        self.warnings
            .values()
            .map(|c| c.load(Ordering::Relaxed))
            .sum()
    }

    /// Logs every non-zero counter, errors first.
    pub fn log_summary(&self) {
        for error_type in ErrorType::iter() {
            let count = self.get_error_count(error_type);
            if count > 0 {
                log::warn!("{}: {}", error_type, count);
            }
        }
        for warning_type in WarningType::iter() {
            let count = self.get_warning_count(warning_type);
            if count > 0 {
                log::info!("{}: {}", warning_type.as_str(), count);
            }
        }
    }
}

impl Default for ProcessingStats {
    fn default() -> Self {
        Self::new()
    }
}
