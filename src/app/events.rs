//! Outbound monitor events.
//!
//! The [`Monitor`](super::service::Monitor) emits these through the
//! [`EventSink`](super::ports::EventSink) port. The log adapter turns each
//! into one line; tests record them.

use core::time::Duration;

use crate::events::Timestamp;
use crate::fsm::Mode;
use crate::policy::dispatch::Action;
use crate::policy::led::LedState;

/// Structured events emitted by the monitor core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorEvent {
    /// The initial mode was resolved.
    Started { mode: Mode, deferred_reset: bool },

    /// The mode changed (only ever STARTUP → IN_USE).
    ModeChanged { from: Mode, to: Mode },

    /// A press opened.
    Pressed { at: Timestamp },

    /// A press/release cycle completed and `action` was dispatched.
    Dispatched { held: Duration, mode: Mode, action: Action },

    /// The LED policy issued a new state.
    Led(LedState),

    /// Something unexpected that does not stop the monitor.
    Diagnostic(Diagnostic),
}

/// Non-fatal anomalies reported to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Press while a press was already open; the original start is kept.
    PressWhileHeld { at: Timestamp, since: Timestamp },
    /// Release with no open press: invalid duration, nothing dispatched.
    InvalidRelease { at: Timestamp },
    /// The reset marker could not be read, written or removed.
    MarkerFailed(String),
    /// A transient edge-source error; the loop continued.
    SourceError(String),
}
