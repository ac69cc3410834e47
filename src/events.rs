//! Inbound control events.
//!
//! Every input the monitor reacts to is funnelled through one ordered
//! stream of [`ControlEvent`]s consumed by a single control loop:
//!
//! ```text
//! ┌──────────────────┐
//! │ Press edge source│──▶ Edge(PRESS/RELEASE, ts) ─┐
//! └──────────────────┘                             │    ┌──────────────┐
//!                                                  ├───▶│ Control loop │
//! ┌──────────────────┐                             │    │  (consumer)  │
//! │ Ticker           │──▶ Tick(ts) / GraceExpired ─┘    └──────────────┘
//! └──────────────────┘
//! ```
//!
//! Because there is exactly one consumer, the press interval and the
//! operating mode have a single writer and need no locking.

use core::fmt;
use core::time::Duration;

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Monotonic timestamp with nanosecond resolution.
///
/// The origin is arbitrary (the clock adapter picks it); only differences
/// between two timestamps from the same clock are meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const ZERO: Self = Self(0);

    pub const fn from_nanos(nanos: u64) -> Self {
        Self(nanos)
    }

    pub const fn from_millis(millis: u64) -> Self {
        Self(millis.saturating_mul(1_000_000))
    }

    pub const fn from_secs(secs: u64) -> Self {
        Self(secs.saturating_mul(NANOS_PER_SEC))
    }

    pub const fn as_nanos(self) -> u64 {
        self.0
    }

    /// Time elapsed from `earlier` to `self`, or `None` if `earlier` is later.
    pub fn checked_since(self, earlier: Timestamp) -> Option<Duration> {
        self.0.checked_sub(earlier.0).map(Duration::from_nanos)
    }

    /// Time elapsed from `earlier` to `self`, clamped at zero.
    pub fn saturating_since(self, earlier: Timestamp) -> Duration {
        self.checked_since(earlier).unwrap_or(Duration::ZERO)
    }

    /// `self + d`, saturating at the end of the representable range.
    pub fn saturating_add(self, d: Duration) -> Timestamp {
        let nanos = u64::try_from(d.as_nanos()).unwrap_or(u64::MAX);
        Self(self.0.saturating_add(nanos))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.0 / NANOS_PER_SEC, self.0 % NANOS_PER_SEC)
    }
}

/// Direction of a button edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    /// Button went down.
    Press,
    /// Button came up.
    Release,
}

/// A press or release edge with the time it was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub kind: EdgeKind,
    pub at: Timestamp,
}

impl Edge {
    pub const fn press(at: Timestamp) -> Self {
        Self {
            kind: EdgeKind::Press,
            at,
        }
    }

    pub const fn release(at: Timestamp) -> Self {
        Self {
            kind: EdgeKind::Release,
            at,
        }
    }
}

/// Everything the control loop feeds into the [`Monitor`](crate::app::service::Monitor).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    /// A button edge from the press edge source.
    Edge(Edge),
    /// Periodic tick: re-sample the held duration for LED feedback.
    Tick(Timestamp),
    /// The one-shot start-up grace timer expired.
    GraceExpired(Timestamp),
}
