//! Trailing-window state retention.
//!
//! Every detector keys its state by communicating endpoints and keeps a
//! list of observation timestamps. Retention filters that list to the
//! trailing window; a key whose list empties is deleted outright, so no
//! dangling keys persist and memory stays bounded to
//! O(active keys x window size).

use std::net::IpAddr;

use chrono::{DateTime, Duration, Utc};

/// `(source, destination)` key used by the port scan and flood detectors.
pub type PairKey = (IpAddr, IpAddr);

/// Drops timestamps that have fallen out of the trailing window ending at
/// `now`.
pub fn retain_recent(timestamps: &mut Vec<DateTime<Utc>>, now: DateTime<Utc>, window_ms: u64) {
    let window = Duration::milliseconds(window_ms as i64);
    timestamps.retain(|ts| now.signed_duration_since(*ts) < window);
}
