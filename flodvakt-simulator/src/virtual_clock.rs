//! # Virtual Clock for Simulation
//!
//! A deterministic clock used in replay and scenario tests, so window
//! boundary behavior never depends on the wall clock.
//!
//! ## Expectations:
//! - Millisecond resolution (flow timestamps are millisecond-grained)
//! - Seedable and deterministic
//! - Lock-free operations

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

/// A simple virtual clock that advances in milliseconds from a seed epoch.
#[derive(Clone)]
pub struct VirtualClock {
    // Shared atomic counter of milliseconds since the Unix epoch.
    offset_ms: Arc<AtomicU64>,
}

impl VirtualClock {
    /// Creates a new virtual clock seeded at the given Unix-epoch
    /// millisecond offset.
    pub fn new(seed_ms: u64) -> Self {
        Self {
            offset_ms: Arc::new(AtomicU64::new(seed_ms)),
        }
    }

    /// Returns the current virtual time in epoch milliseconds.
    #[inline]
    pub fn now_ms(&self) -> u64 {
        self.offset_ms.load(Ordering::Acquire)
    }

    /// Returns the current virtual time as a timestamp.
    pub fn now(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.now_ms() as i64)
            .single()
            .unwrap_or_default()
    }

    /// Advances the virtual clock by the given number of milliseconds.
    #[inline]
    pub fn advance(&self, ms: u64) {
        self.offset_ms.fetch_add(ms, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_initial_value() {
        let clock = VirtualClock::new(100);
        assert_eq!(clock.now_ms(), 100);
    }

    #[test]
    fn test_clock_advance() {
        let clock = VirtualClock::new(0);
        clock.advance(500);
        assert_eq!(clock.now_ms(), 500);
        clock.advance(250);
        assert_eq!(clock.now_ms(), 750);
    }

    #[test]
    fn clones_share_time() {
        let clock = VirtualClock::new(0);
        let other = clock.clone();
        clock.advance(1_000);
        assert_eq!(other.now_ms(), 1_000);
    }
}
