//! Port traits: the hexagonal boundary between the monitor core and the board.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Monitor (domain)
//! ```
//!
//! Driven adapters (edge sources, LED script, system commands, marker
//! file) implement these traits. The [`Monitor`](super::service::Monitor)
//! and the [control loop](crate::runtime) consume them via generics, so
//! tests substitute recording fakes and never reboot the host.

use core::time::Duration;

use crate::error::{MarkerError, Result};
use crate::events::{Edge, Timestamp};
use crate::policy::led::LedState;

// ───────────────────────────────────────────────────────────────
// Press edge source (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Produces press/release edges, whichever way the board senses them.
///
/// The control loop never branches on the concrete backend.
pub trait PressEdgeSource {
    /// Wait at most `timeout` for the next edge.
    ///
    /// `Ok(None)` means nothing arrived in time, possibly spuriously.
    /// Errors other than [`Error::Disconnected`](crate::error::Error::Disconnected)
    /// are transient.
    fn poll(&mut self, timeout: Duration) -> Result<Option<Edge>>;
}

// ───────────────────────────────────────────────────────────────
// Clock (driven adapter: time → domain)
// ───────────────────────────────────────────────────────────────

/// Monotonic time source shared by the loop and the edge source.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

// ───────────────────────────────────────────────────────────────
// LED sink (driven adapter: domain → LED)
// ───────────────────────────────────────────────────────────────

/// Fire-and-forget LED control. Re-issuing the same state is harmless.
pub trait LedSink {
    fn set_led(&mut self, state: LedState);
}

// ───────────────────────────────────────────────────────────────
// System actions (driven adapter: domain → host)
// ───────────────────────────────────────────────────────────────

/// Board-level actions. Under normal operation these terminate or
/// materially alter the host; the core never waits on or inspects them.
pub trait SystemActions {
    fn reboot(&mut self);

    fn shutdown(&mut self);

    /// `requested_by_user` is true when confirmed by a short press during
    /// the grace window, false when run from the persisted marker.
    fn factory_reset(&mut self, requested_by_user: bool);
}

// ───────────────────────────────────────────────────────────────
// Reset marker (driven adapter: domain ↔ persistence)
// ───────────────────────────────────────────────────────────────

/// Persisted "factory reset requested, pending next boot" flag.
///
/// Implementations MUST make `create` atomic (no partially written
/// marker is ever observable) and treat deleting an absent marker as
/// success.
pub trait ResetMarker {
    fn exists(&self) -> core::result::Result<bool, MarkerError>;

    fn create(&mut self) -> core::result::Result<(), MarkerError>;

    fn delete(&mut self) -> core::result::Result<(), MarkerError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The monitor emits structured [`MonitorEvent`](super::events::MonitorEvent)s
/// through this port. Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::MonitorEvent);
}

/// Bundle of the output ports the monitor drives.
///
/// Lets one mutable borrow satisfy all of them, the way a single
/// hardware adapter implements several ports.
pub trait Board: LedSink + SystemActions + ResetMarker + EventSink {}

impl<T: LedSink + SystemActions + ResetMarker + EventSink> Board for T {}
