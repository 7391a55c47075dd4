//! Injectable time source.
//!
//! All lifecycle decisions compare timestamps against "now". Taking the
//! current time through a trait instead of calling `Utc::now()` at every
//! call site keeps the evaluator deterministic under test.

use std::sync::Mutex;

use chrono::Utc;

use crate::types::Timestamp;

/// Supplies the current time.
pub trait Clock: Send + Sync {
    /// The current instant in UTC.
    fn now(&self) -> Timestamp;
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// Test clock returning a fixed, manually advanced instant.
pub struct FixedClock {
    now: Mutex<Timestamp>,
}

impl FixedClock {
    /// Create a clock frozen at `now`.
    pub fn new(now: Timestamp) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Replace the current instant.
    pub fn set(&self, now: Timestamp) {
        *self.now.lock().unwrap() = now;
    }

    /// Move the clock forward by `delta`.
    pub fn advance(&self, delta: chrono::Duration) {
        let mut now = self.now.lock().unwrap();
        *now += delta;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        *self.now.lock().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn fixed_clock_advances() {
        let start = Utc.with_ymd_and_hms(2025, 9, 1, 8, 0, 0).unwrap();
        let clock = FixedClock::new(start);
        assert_eq!(clock.now(), start);

        clock.advance(Duration::minutes(90));
        assert_eq!(clock.now(), start + Duration::minutes(90));
    }
}
