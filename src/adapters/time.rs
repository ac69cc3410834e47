//! Monotonic clock adapter.
//!
//! Wraps `std::time::Instant` (CLOCK_MONOTONIC on Linux) so wall-clock
//! steps from NTP or an RTC sync never distort a press duration.
//! Clones share the same origin, so timestamps taken on the device
//! reader thread and on the control loop are directly comparable.

use std::time::Instant;

use crate::app::ports::Clock;
use crate::events::Timestamp;

#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Timestamp {
        let nanos = u64::try_from(self.origin.elapsed().as_nanos()).unwrap_or(u64::MAX);
        Timestamp::from_nanos(nanos)
    }
}
