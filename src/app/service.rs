//! Monitor service: the hexagonal core.
//!
//! [`Monitor`] owns the duration tracker and the mode machine and applies
//! the two policies. Every input arrives as a [`ControlEvent`] from the
//! single control loop; every output leaves through the [`Board`] ports.
//!
//! ```text
//!                 ┌──────────────────────────────┐ ──▶ LedSink
//!  ControlEvent ─▶│           Monitor            │ ──▶ SystemActions
//!                 │ Tracker · Mode · LED · Disp. │ ◀─▶ ResetMarker
//!                 └──────────────────────────────┘ ──▶ EventSink
//! ```
//!
//! Per event: update the tracker, re-evaluate the LED, and on a release
//! with a matching press dispatch exactly one action.

use core::time::Duration;

use log::{info, warn};

use crate::config::{MonitorConfig, Thresholds};
use crate::error::MarkerError;
use crate::events::{ControlEvent, Edge, EdgeKind, Timestamp};
use crate::fsm::{Mode, ModeMachine, Transition};
use crate::policy::dispatch::{self, Action};
use crate::policy::led::{self, LedState};
use crate::tracker::{DurationTracker, TrackError};

use super::events::{Diagnostic, MonitorEvent};
use super::ports::{Board, EventSink, LedSink};

// ───────────────────────────────────────────────────────────────
// Monitor
// ───────────────────────────────────────────────────────────────

pub struct Monitor {
    thresholds: Thresholds,
    tracker: DurationTracker,
    fsm: ModeMachine,
    /// Delay until the first timer notification, from the boot plan.
    first_tick: Duration,
    last_led: Option<LedState>,
    dispatched: u64,
}

impl Monitor {
    // ── Lifecycle ─────────────────────────────────────────────

    /// Resolve the initial mode from the reset marker and perform the
    /// start-up side effects (LED, deferred factory reset).
    pub fn start(config: &MonitorConfig, board: &mut impl Board) -> Self {
        let marker_present = match board.exists() {
            Ok(present) => present,
            Err(e) => {
                warn!("reset marker unreadable ({e}), assuming absent");
                board.emit(&MonitorEvent::Diagnostic(Diagnostic::MarkerFailed(
                    e.to_string(),
                )));
                false
            }
        };

        let (fsm, plan) =
            ModeMachine::boot(marker_present, config.startup_grace(), config.tick_interval());

        if plan.deferred_reset {
            // Consume the marker first so a reset that returns (or a crash
            // mid-reset) cannot loop on it.
            if let Err(e) = board.delete() {
                report_marker_failure(board, &e);
            }
            board.factory_reset(false);
        }

        let mut monitor = Self {
            thresholds: config.thresholds,
            tracker: DurationTracker::new(),
            fsm,
            first_tick: plan.first_tick,
            last_led: None,
            dispatched: 0,
        };
        monitor.issue_led(plan.led, true, board);
        board.emit(&MonitorEvent::Started {
            mode: plan.mode,
            deferred_reset: plan.deferred_reset,
        });
        info!("monitor started in {}", plan.mode);
        monitor
    }

    // ── Event handling ────────────────────────────────────────

    pub fn handle(&mut self, event: ControlEvent, board: &mut impl Board) {
        match event {
            ControlEvent::Edge(edge) => self.on_edge(edge, board),
            ControlEvent::Tick(now) => self.on_tick(now, board),
            ControlEvent::GraceExpired(now) => self.on_grace_expired(now, board),
        }
    }

    fn on_edge(&mut self, edge: Edge, board: &mut impl Board) {
        match edge.kind {
            EdgeKind::Press => match self.tracker.on_press(edge.at) {
                Ok(()) => {
                    board.emit(&MonitorEvent::Pressed { at: edge.at });
                    self.refresh_led(edge.at, board);
                }
                Err(TrackError::AlreadyPressed { since }) => {
                    board.emit(&MonitorEvent::Diagnostic(Diagnostic::PressWhileHeld {
                        at: edge.at,
                        since,
                    }));
                }
                Err(TrackError::InvalidRelease) => {}
            },
            EdgeKind::Release => match self.tracker.on_release(edge.at) {
                Ok(held) => self.complete_press(held, board),
                Err(_) => {
                    board.emit(&MonitorEvent::Diagnostic(Diagnostic::InvalidRelease {
                        at: edge.at,
                    }));
                }
            },
        }
    }

    /// Dispatch the finished press, then leave STARTUP whatever the action.
    fn complete_press(&mut self, held: Duration, board: &mut impl Board) {
        let mode = self.fsm.mode();
        let action = dispatch::classify(held, mode, &self.thresholds);
        info!(
            "press released after {:.3}s in {}: {}",
            held.as_secs_f64(),
            mode,
            action
        );

        if let Err(e) = dispatch::execute(action, board) {
            report_marker_failure(board, &e);
        }
        self.dispatched += 1;
        board.emit(&MonitorEvent::Dispatched { held, mode, action });

        if let Some(t) = self.fsm.on_release() {
            emit_transition(t, board);
        }
        self.issue_led(led::after_release(), true, board);
    }

    fn on_tick(&mut self, now: Timestamp, board: &mut impl Board) {
        self.refresh_led(now, board);
    }

    fn on_grace_expired(&mut self, now: Timestamp, board: &mut impl Board) {
        match self.fsm.on_grace_expired() {
            Some(t) => {
                info!("grace window over at {now}");
                emit_transition(t, board);
                self.issue_led(LedState::FlashGreen, true, board);
            }
            None => self.refresh_led(now, board),
        }
    }

    // ── LED ───────────────────────────────────────────────────

    /// Re-derive the LED from (mode, held duration). While a press is open
    /// the state is re-issued every time so a lost update self-heals.
    fn refresh_led(&mut self, now: Timestamp, board: &mut impl Board) {
        let held = self.tracker.sample(now);
        let state = led::desired(self.fsm.mode(), held, &self.thresholds);
        self.issue_led(state, held.is_some(), board);
    }

    fn issue_led<B: LedSink + EventSink>(&mut self, state: LedState, force: bool, board: &mut B) {
        if !force && self.last_led == Some(state) {
            return;
        }
        board.set_led(state);
        if self.last_led != Some(state) {
            board.emit(&MonitorEvent::Led(state));
        }
        self.last_led = Some(state);
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn mode(&self) -> Mode {
        self.fsm.mode()
    }

    pub fn is_held(&self) -> bool {
        self.tracker.is_open()
    }

    /// Held duration at `now`, if the button is down.
    pub fn held(&self, now: Timestamp) -> Option<Duration> {
        self.tracker.sample(now)
    }

    pub fn last_led(&self) -> Option<LedState> {
        self.last_led
    }

    /// Delay the control loop should arm for the first timer notification.
    pub fn first_tick(&self) -> Duration {
        self.first_tick
    }

    /// Number of completed press cycles that dispatched an action.
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }

    /// Action a release at `now` would dispatch, if the button is down.
    pub fn pending_action(&self, now: Timestamp) -> Option<Action> {
        self.held(now)
            .map(|held| dispatch::classify(held, self.fsm.mode(), &self.thresholds))
    }
}

// ── Internal ──────────────────────────────────────────────────

fn emit_transition(t: Transition, board: &mut impl EventSink) {
    info!("mode {} -> {}", t.from, t.to);
    board.emit(&MonitorEvent::ModeChanged {
        from: t.from,
        to: t.to,
    });
}

fn report_marker_failure(board: &mut impl EventSink, e: &MarkerError) {
    warn!("reset marker: {e}");
    board.emit(&MonitorEvent::Diagnostic(Diagnostic::MarkerFailed(
        e.to_string(),
    )));
}
