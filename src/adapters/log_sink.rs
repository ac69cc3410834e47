//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing each monitor event as one line
//! through the `log` facade (journald / console in production).

use log::{info, warn};

use crate::app::events::{Diagnostic, MonitorEvent};
use crate::app::ports::EventSink;

/// Adapter that logs every [`MonitorEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &MonitorEvent) {
        match event {
            MonitorEvent::Started {
                mode,
                deferred_reset,
            } => {
                info!("START | mode={} | deferred_reset={}", mode, deferred_reset);
            }
            MonitorEvent::ModeChanged { from, to } => {
                info!("MODE | {} -> {}", from, to);
            }
            MonitorEvent::Pressed { at } => {
                info!("PRESS | at={}", at);
            }
            MonitorEvent::Dispatched { held, mode, action } => {
                info!(
                    "ACTION | held={:.3}s | mode={} | action={}",
                    held.as_secs_f64(),
                    mode,
                    action
                );
            }
            MonitorEvent::Led(state) => {
                info!("LED | {}", state);
            }
            MonitorEvent::Diagnostic(d) => match d {
                Diagnostic::PressWhileHeld { at, since } => {
                    warn!("DIAG | press at {} while held since {}", at, since);
                }
                Diagnostic::InvalidRelease { at } => {
                    warn!("DIAG | invalid time: release at {} without press", at);
                }
                Diagnostic::MarkerFailed(msg) => {
                    warn!("DIAG | reset marker: {}", msg);
                }
                Diagnostic::SourceError(msg) => {
                    warn!("DIAG | edge source: {}", msg);
                }
            },
        }
    }
}
