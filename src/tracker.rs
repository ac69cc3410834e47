//! Press duration tracker.
//!
//! Turns press/release edges into a single open-or-closed press interval:
//!
//! | Call              | Interval closed          | Interval open                |
//! |-------------------|--------------------------|------------------------------|
//! | `on_press(ts)`    | opens at `ts`            | rejected, start kept         |
//! | `on_release(ts)`  | `InvalidRelease`         | closes, returns `ts - start` |
//! | `sample(now)`     | `None`                   | `Some(now - start)`          |
//!
//! Durations keep nanosecond precision here; the policies truncate to
//! whole seconds with [`whole_secs`].

use core::time::Duration;

use log::debug;

use crate::events::Timestamp;

/// Why an edge was not applied to the interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackError {
    /// Press seen while a press is already open. Carries the open start.
    AlreadyPressed { since: Timestamp },
    /// Release seen with no open press.
    InvalidRelease,
}

#[derive(Debug, Default)]
pub struct DurationTracker {
    start: Option<Timestamp>,
}

impl DurationTracker {
    pub fn new() -> Self {
        Self { start: None }
    }

    /// Open the interval at `at`.
    pub fn on_press(&mut self, at: Timestamp) -> Result<(), TrackError> {
        if let Some(since) = self.start {
            debug!("press at {at} ignored: button already held since {since}");
            return Err(TrackError::AlreadyPressed { since });
        }
        self.start = Some(at);
        Ok(())
    }

    /// Close the interval and return how long the button was held.
    ///
    /// A release earlier than the recorded start (clock skew between edge
    /// stamping and the press) yields a zero duration rather than an error.
    pub fn on_release(&mut self, at: Timestamp) -> Result<Duration, TrackError> {
        match self.start.take() {
            Some(start) => Ok(at.saturating_since(start)),
            None => {
                debug!("release at {at} with no matching press: invalid duration");
                Err(TrackError::InvalidRelease)
            }
        }
    }

    /// Current held duration, if the button is down.
    pub fn sample(&self, now: Timestamp) -> Option<Duration> {
        self.start.map(|start| now.saturating_since(start))
    }

    pub fn is_open(&self) -> bool {
        self.start.is_some()
    }

    pub fn open_since(&self) -> Option<Timestamp> {
        self.start
    }
}

/// Truncate a duration to whole seconds; the policies act on these.
pub fn whole_secs(d: Duration) -> u64 {
    d.as_secs()
}
