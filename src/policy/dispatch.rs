//! Action dispatcher.
//!
//! Maps a finished press (whole seconds, truncated) and the mode at the
//! time of release to exactly one terminal action, then carries it out
//! against the [`SystemActions`] and [`ResetMarker`] ports.
//!
//! | Band     | IN_USE          | STARTUP                  |
//! |----------|-----------------|--------------------------|
//! | `Short`  | `Reboot`        | `FactoryReset` (user)    |
//! | `Medium` | `ScheduleReset` | `ScheduleReset`          |
//! | `Long`   | `Shutdown`      | `Shutdown`               |
//! | `Cancel` | `Cancel`        | `Cancel`                 |
//!
//! System actions are fire-and-forget: nothing here waits for, or
//! retries, a reboot or shutdown.

use core::fmt;
use core::time::Duration;

use log::info;

use crate::app::ports::{ResetMarker, SystemActions};
use crate::config::Thresholds;
use crate::error::MarkerError;
use crate::fsm::Mode;

use super::Band;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Restart the board.
    Reboot,
    /// Persist the reset marker; the reset runs on the next start-up.
    ScheduleReset,
    /// Halt the board.
    Shutdown,
    /// Do nothing; the pending action was abandoned.
    Cancel,
    /// Factory reset now, confirmed by the user during the grace window.
    FactoryReset,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Reboot => "reboot",
            Self::ScheduleReset => "schedule factory reset",
            Self::Shutdown => "shutdown",
            Self::Cancel => "cancel",
            Self::FactoryReset => "factory reset",
        };
        f.write_str(name)
    }
}

/// Select the action for a completed press. Total over all durations.
pub fn classify(held: Duration, mode: Mode, thresholds: &Thresholds) -> Action {
    match (thresholds.band(held), mode) {
        (Band::Short, Mode::InUse) => Action::Reboot,
        (Band::Short, Mode::Startup) => Action::FactoryReset,
        (Band::Medium, _) => Action::ScheduleReset,
        (Band::Long, _) => Action::Shutdown,
        (Band::Cancel, _) => Action::Cancel,
    }
}

/// Carry out `action`. Only persisting the marker can fail observably.
///
/// The `board` parameter satisfies **both** [`SystemActions`] and
/// [`ResetMarker`], avoiding a double mutable borrow of one adapter.
pub fn execute(
    action: Action,
    board: &mut (impl SystemActions + ResetMarker),
) -> Result<(), MarkerError> {
    match action {
        Action::Reboot => {
            info!("short press: reboot");
            board.reboot();
        }
        Action::ScheduleReset => {
            info!("medium press: factory reset on next start-up");
            board.create()?;
        }
        Action::Shutdown => {
            info!("long press: shutdown");
            board.shutdown();
        }
        Action::Cancel => {
            info!("press held past the last band: cancelled");
        }
        Action::FactoryReset => {
            info!("short press during start-up: factory reset");
            board.factory_reset(true);
        }
    }
    Ok(())
}
