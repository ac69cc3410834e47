//! Operating-mode state machine.
//!
//! ```text
//!            marker absent                 marker present
//!                 │                              │
//!                 ▼                              │  factory reset (deferred)
//!            ┌─────────┐  grace expiry           ▼
//!            │ STARTUP │ ─────────────────▶ ┌────────┐
//!            └─────────┘  any valid release │ IN_USE │ (terminal)
//!                 └───────────────────────▶ └────────┘
//! ```
//!
//! The machine only decides *which* mode the monitor is in. The side
//! effects that accompany a transition (LED, factory reset, timers) are
//! carried out by the [`Monitor`](crate::app::service::Monitor) from the
//! [`BootPlan`] and [`Transition`] values returned here.

use core::fmt;
use core::time::Duration;

use log::info;

use crate::policy::led::LedState;

/// The two operating modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Grace window after start-up: a short press confirms a factory reset.
    Startup,
    /// Normal operation: a short press reboots.
    InUse,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Startup => f.write_str("STARTUP"),
            Self::InUse => f.write_str("IN_USE"),
        }
    }
}

/// A completed mode change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Mode,
    pub to: Mode,
}

/// What the monitor must do once the initial mode is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootPlan {
    pub mode: Mode,
    /// LED to show immediately.
    pub led: LedState,
    /// Delay until the first timer notification (the grace-expiry tick).
    pub first_tick: Duration,
    /// Consume the persisted marker and run the deferred factory reset.
    pub deferred_reset: bool,
}

#[derive(Debug)]
pub struct ModeMachine {
    mode: Mode,
}

impl ModeMachine {
    /// Resolve the initial mode from the persisted reset marker.
    ///
    /// - marker absent: STARTUP, solid red, first tick after the full grace.
    /// - marker present: straight to IN_USE with a deferred factory reset;
    ///   the first tick only waits one tick interval.
    pub fn boot(marker_present: bool, grace: Duration, tick: Duration) -> (Self, BootPlan) {
        let plan = if marker_present {
            info!("reset marker present: deferred factory reset, mode IN_USE");
            BootPlan {
                mode: Mode::InUse,
                led: LedState::FlashGreen,
                first_tick: tick,
                deferred_reset: true,
            }
        } else {
            info!(
                "start-up grace window {}s: short press for factory reset",
                grace.as_secs()
            );
            BootPlan {
                mode: Mode::Startup,
                led: LedState::Red,
                first_tick: grace,
                deferred_reset: false,
            }
        };
        (Self { mode: plan.mode }, plan)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Grace timer expired. Only meaningful in STARTUP; idempotent.
    pub fn on_grace_expired(&mut self) -> Option<Transition> {
        self.enter_in_use()
    }

    /// A press/release cycle completed. Whatever the action, STARTUP ends.
    pub fn on_release(&mut self) -> Option<Transition> {
        self.enter_in_use()
    }

    fn enter_in_use(&mut self) -> Option<Transition> {
        match self.mode {
            Mode::Startup => {
                self.mode = Mode::InUse;
                Some(Transition {
                    from: Mode::Startup,
                    to: Mode::InUse,
                })
            }
            Mode::InUse => None,
        }
    }
}
