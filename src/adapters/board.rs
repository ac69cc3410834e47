//! Board adapter bridging the real collaborators to the output ports.
//!
//! Owns the LED script, the system command runner, the reset marker file
//! and the event log, exposing them through [`LedSink`],
//! [`SystemActions`], [`ResetMarker`] and [`EventSink`]. One value then
//! satisfies the monitor's [`Board`](crate::app::ports::Board) bound.

use crate::app::events::MonitorEvent;
use crate::app::ports::{EventSink, LedSink, ResetMarker, SystemActions};
use crate::config::MonitorConfig;
use crate::error::{MarkerError, Result};
use crate::policy::led::LedState;

use super::led_script::ScriptLed;
use super::log_sink::LogEventSink;
use super::marker_file::FileResetMarker;
use super::system_commands::CommandActions;

/// Concrete adapter that combines all board collaborators behind port traits.
pub struct LinuxBoard {
    led: ScriptLed,
    actions: CommandActions,
    marker: FileResetMarker,
    log: LogEventSink,
}

impl LinuxBoard {
    /// Build the adapters and start the LED worker.
    pub fn new(config: &MonitorConfig) -> Result<Self> {
        Ok(Self {
            led: ScriptLed::start(config.led_script.clone())?,
            actions: CommandActions::new(config),
            marker: FileResetMarker::new(config.marker_path.clone()),
            log: LogEventSink::new(),
        })
    }

    pub fn marker(&self) -> &FileResetMarker {
        &self.marker
    }
}

// ── LedSink implementation ────────────────────────────────────

impl LedSink for LinuxBoard {
    fn set_led(&mut self, state: LedState) {
        self.led.set_led(state);
    }
}

// ── SystemActions implementation ──────────────────────────────

impl SystemActions for LinuxBoard {
    fn reboot(&mut self) {
        self.actions.reboot();
    }

    fn shutdown(&mut self) {
        self.actions.shutdown();
    }

    fn factory_reset(&mut self, requested_by_user: bool) {
        self.actions.factory_reset(requested_by_user);
    }
}

// ── ResetMarker implementation ────────────────────────────────

impl ResetMarker for LinuxBoard {
    fn exists(&self) -> core::result::Result<bool, MarkerError> {
        self.marker.exists()
    }

    fn create(&mut self) -> core::result::Result<(), MarkerError> {
        self.marker.create()
    }

    fn delete(&mut self) -> core::result::Result<(), MarkerError> {
        self.marker.delete()
    }
}

// ── EventSink implementation ──────────────────────────────────

impl EventSink for LinuxBoard {
    fn emit(&mut self, event: &MonitorEvent) {
        self.log.emit(event);
    }
}
