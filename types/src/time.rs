//! Timestamp type used throughout the platform.
//!
//! Timestamps are Unix epoch seconds (UTC), supplied by the caller of every
//! time-sensitive operation. The core never reads the wall clock itself.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Seconds in one day.
pub const SECS_PER_DAY: u64 = 24 * 3600;

/// A Unix timestamp in seconds since epoch (UTC).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn new(secs: u64) -> Self {
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// Whether this timestamp + duration has passed relative to `now`.
    pub fn has_expired(&self, duration_secs: u64, now: Timestamp) -> bool {
        now.0 >= self.0.saturating_add(duration_secs)
    }

    /// Seconds left until this timestamp + duration, zero once expired.
    pub fn remaining(&self, duration_secs: u64, now: Timestamp) -> u64 {
        self.0.saturating_add(duration_secs).saturating_sub(now.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_is_inclusive() {
        let opened = Timestamp::new(1_000);
        assert!(!opened.has_expired(SECS_PER_DAY, Timestamp::new(1_000 + SECS_PER_DAY - 1)));
        assert!(opened.has_expired(SECS_PER_DAY, Timestamp::new(1_000 + SECS_PER_DAY)));
    }

    #[test]
    fn expiry_saturates_near_max() {
        let opened = Timestamp::new(u64::MAX - 5);
        assert!(!opened.has_expired(SECS_PER_DAY, Timestamp::new(u64::MAX - 1)));
        assert!(opened.has_expired(SECS_PER_DAY, Timestamp::new(u64::MAX)));
    }

    #[test]
    fn remaining_counts_down_to_zero() {
        let opened = Timestamp::new(100);
        assert_eq!(opened.remaining(60, Timestamp::new(100)), 60);
        assert_eq!(opened.remaining(60, Timestamp::new(159)), 1);
        assert_eq!(opened.remaining(60, Timestamp::new(500)), 0);
    }
}
