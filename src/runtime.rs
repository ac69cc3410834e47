//! Timer and control loop.
//!
//! One thread owns the [`Monitor`]. It blocks on the edge source for at
//! most the time left until the next timer deadline, handles whatever
//! edges arrived (in arrival order), then re-reads the clock and fires the
//! due timer notification, if any:
//!
//! ```text
//!   ┌──▶ wait ≤ until_next_tick ──▶ edges (FIFO) ──▶ re-read clock ──┐
//!   │                                                                │
//!   └──────────────────── tick / grace-expired if due ◀──────────────┘
//! ```
//!
//! Timer notifications are computed from deadlines inside the same loop
//! rather than delivered asynchronously, so the press interval and the
//! mode are only ever touched from this thread.

use core::time::Duration;

use log::{debug, warn};

use crate::app::events::{Diagnostic, MonitorEvent};
use crate::app::ports::{Board, Clock, PressEdgeSource};
use crate::app::service::Monitor;
use crate::error::Result;
use crate::events::{ControlEvent, Timestamp};

/// Upper bound on edges drained per wake-up before the timer gets a turn.
const MAX_EDGES_PER_WAKE: usize = 64;

// ═══════════════════════════════════════════════════════════════
//  Ticker
// ═══════════════════════════════════════════════════════════════

/// Periodic tick whose first notification is the grace expiry.
///
/// The first deadline is `first` after start; later ones follow every
/// `interval`. Deadlines missed while the loop was busy collapse into a
/// single notification: the LED policy re-derives everything from the
/// current state, so nothing is lost by skipping.
#[derive(Debug, Clone)]
pub struct Ticker {
    next: Timestamp,
    interval: Duration,
    grace_pending: bool,
}

impl Ticker {
    pub fn new(start: Timestamp, first: Duration, interval: Duration) -> Self {
        Self {
            next: start.saturating_add(first),
            interval,
            grace_pending: true,
        }
    }

    /// Time left until the next deadline (zero if already due).
    pub fn until_next(&self, now: Timestamp) -> Duration {
        self.next.saturating_since(now)
    }

    pub fn next_deadline(&self) -> Timestamp {
        self.next
    }

    /// Fire the notification due at `now`, if any.
    pub fn poll(&mut self, now: Timestamp) -> Option<ControlEvent> {
        if now < self.next {
            return None;
        }
        let event = if self.grace_pending {
            self.grace_pending = false;
            ControlEvent::GraceExpired(now)
        } else {
            ControlEvent::Tick(now)
        };

        self.next = self.next.saturating_add(self.interval);
        if self.next <= now {
            let missed = now.saturating_since(self.next);
            debug!("ticker: skipped {:.1}s of deadlines", missed.as_secs_f64());
            self.next = now.saturating_add(self.interval);
        }
        Some(event)
    }
}

// ═══════════════════════════════════════════════════════════════
//  Control loop
// ═══════════════════════════════════════════════════════════════

pub struct ControlLoop<S, C> {
    source: S,
    clock: C,
    ticker: Ticker,
}

impl<S: PressEdgeSource, C: Clock> ControlLoop<S, C> {
    /// Arm the timer from the monitor's boot plan.
    pub fn new(source: S, clock: C, monitor: &Monitor, interval: Duration) -> Self {
        let ticker = Ticker::new(clock.now(), monitor.first_tick(), interval);
        Self {
            source,
            clock,
            ticker,
        }
    }

    /// One wait/handle cycle. Only fatal errors are returned.
    pub fn run_once(&mut self, monitor: &mut Monitor, board: &mut impl Board) -> Result<()> {
        let timeout = self.ticker.until_next(self.clock.now());

        let mut wait = timeout;
        for _ in 0..MAX_EDGES_PER_WAKE {
            match self.source.poll(wait) {
                Ok(Some(edge)) => monitor.handle(ControlEvent::Edge(edge), board),
                Ok(None) => break,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!("edge source: {e}");
                    board.emit(&MonitorEvent::Diagnostic(Diagnostic::SourceError(
                        e.to_string(),
                    )));
                    break;
                }
            }
            // Drain whatever else is already queued without waiting again.
            wait = Duration::ZERO;
        }

        // The wait may have taken any amount of time: re-read the clock.
        let now = self.clock.now();
        if let Some(event) = self.ticker.poll(now) {
            monitor.handle(event, board);
        }
        Ok(())
    }

    /// Run until a fatal error. Never returns `Ok`.
    pub fn run(&mut self, monitor: &mut Monitor, board: &mut impl Board) -> Result<()> {
        loop {
            self.run_once(monitor, board)?;
        }
    }

    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }
}
