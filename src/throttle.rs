//! Fixed-interval request throttle.
//!
//! Unlike a token bucket there is no burst capacity: two successive
//! `acquire` calls always return at least `min_interval` apart. The first
//! call returns immediately.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};

/// Spaces out outbound requests.
///
/// The slot is taken when `acquire` returns, so time spent on the request
/// itself counts towards the interval.
pub struct Throttle {
    min_interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl Throttle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_slot: Mutex::new(None),
        }
    }

    /// Waits until the next request may start, then reserves the slot after it.
    pub async fn acquire(&self) {
        // Holding the lock across the sleep queues concurrent callers in order
        let mut next_slot = self.next_slot.lock().await;
        if let Some(at) = *next_slot {
            if at > Instant::now() {
                log::trace!("Throttle waiting {:?}", at - Instant::now());
            }
            sleep_until(at).await;
        }
        *next_slot = Some(Instant::now() + self.min_interval);
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}
