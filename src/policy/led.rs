//! LED feedback policy.
//!
//! Tells the user, while the button is still held, what releasing it now
//! would do:
//!
//! | Held (whole s)   | STARTUP       | IN_USE        | Meaning on release  |
//! |------------------|---------------|---------------|---------------------|
//! | not held         | `Red`         | `FlashGreen`  | steady state        |
//! | < 5              | `Red`         | `Green`       | reset now / reboot  |
//! | 5 ..< 10         | `Red`         | `Red`         | schedule reset      |
//! | 10 ..< 15        | `FlashRed`    | `FlashRed`    | shut down           |
//! | >= 15            | `FlashGreen`  | `FlashGreen`  | cancel              |
//!
//! Right after any release the LED flashes green (back to heartbeat).
//! The mapping is pure; re-evaluating it with unchanged inputs always
//! yields the same state, so re-issuing it on every tick is harmless.

use core::fmt;
use core::time::Duration;

use crate::config::Thresholds;
use crate::fsm::Mode;

use super::Band;

/// LED states understood by the board's LED script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LedState {
    Off = 0,
    Green = 1,
    Red = 2,
    FlashGreen = 3,
    FlashRed = 4,
}

impl LedState {
    /// Numeric code passed to the LED script.
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for LedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Off => "OFF",
            Self::Green => "GREEN",
            Self::Red => "RED",
            Self::FlashGreen => "FLASH_GREEN",
            Self::FlashRed => "FLASH_RED",
        };
        f.write_str(name)
    }
}

/// LED shown when the button is not held.
pub fn steady(mode: Mode) -> LedState {
    match mode {
        Mode::Startup => LedState::Red,
        Mode::InUse => LedState::FlashGreen,
    }
}

/// LED for the current (mode, held duration) pair.
pub fn desired(mode: Mode, held: Option<Duration>, thresholds: &Thresholds) -> LedState {
    let Some(held) = held else {
        return steady(mode);
    };
    match (thresholds.band(held), mode) {
        (Band::Short, Mode::Startup) => LedState::Red,
        (Band::Short, Mode::InUse) => LedState::Green,
        (Band::Medium, _) => LedState::Red,
        (Band::Long, _) => LedState::FlashRed,
        (Band::Cancel, _) => LedState::FlashGreen,
    }
}

/// LED issued immediately after a release, whatever the action.
pub fn after_release() -> LedState {
    LedState::FlashGreen
}
