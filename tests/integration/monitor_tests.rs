//! Integration tests for the Monitor → policies → board pipeline.
//!
//! Events are fed straight into [`Monitor::handle`]; the recording board
//! captures every LED update, system action and marker operation.

use std::io;
use std::time::Duration;

use pb_monitor::app::events::{Diagnostic, MonitorEvent};
use pb_monitor::app::service::Monitor;
use pb_monitor::config::MonitorConfig;
use pb_monitor::events::{ControlEvent, Edge};
use pb_monitor::fsm::Mode;
use pb_monitor::policy::dispatch::Action;
use pb_monitor::policy::led::LedState;

use super::mock_hw::{BoardCall, RecordingBoard, millis, secs};

fn start(board: &mut RecordingBoard) -> Monitor {
    Monitor::start(&MonitorConfig::default(), board)
}

/// Monitor already in IN_USE with a clean call log.
fn in_use() -> (Monitor, RecordingBoard) {
    let mut board = RecordingBoard::new();
    let mut monitor = start(&mut board);
    monitor.handle(ControlEvent::GraceExpired(secs(10)), &mut board);
    assert_eq!(monitor.mode(), Mode::InUse);
    board.clear();
    (monitor, board)
}

fn press_for(monitor: &mut Monitor, board: &mut RecordingBoard, from_ms: u64, held_ms: u64) {
    monitor.handle(ControlEvent::Edge(Edge::press(millis(from_ms))), board);
    monitor.handle(
        ControlEvent::Edge(Edge::release(millis(from_ms + held_ms))),
        board,
    );
}

// ── Start-up ──────────────────────────────────────────────────

#[test]
fn start_without_marker_enters_startup_with_red_led() {
    let mut board = RecordingBoard::new();
    let monitor = start(&mut board);

    assert_eq!(monitor.mode(), Mode::Startup);
    assert_eq!(monitor.first_tick(), Duration::from_secs(10));
    assert_eq!(board.calls, vec![BoardCall::SetLed(LedState::Red)]);
    assert_eq!(
        board.events.last(),
        Some(&MonitorEvent::Started {
            mode: Mode::Startup,
            deferred_reset: false
        })
    );
}

#[test]
fn grace_expiry_enters_in_use_without_system_action() {
    let mut board = RecordingBoard::new();
    let mut monitor = start(&mut board);
    board.clear();

    monitor.handle(ControlEvent::GraceExpired(secs(10)), &mut board);

    assert_eq!(monitor.mode(), Mode::InUse);
    assert_eq!(board.last_led(), Some(LedState::FlashGreen));
    assert!(board.system_calls().is_empty());
    assert!(board.events.contains(&MonitorEvent::ModeChanged {
        from: Mode::Startup,
        to: Mode::InUse
    }));
}

#[test]
fn marker_at_start_runs_deferred_reset_once() {
    let mut board = RecordingBoard::with_marker();
    let monitor = start(&mut board);

    assert_eq!(monitor.mode(), Mode::InUse);
    assert_eq!(monitor.first_tick(), Duration::from_secs(2));
    assert!(!board.marker, "marker must be consumed");
    assert_eq!(
        board.system_calls(),
        vec![BoardCall::FactoryReset {
            requested_by_user: false
        }]
    );
    assert_eq!(board.last_led(), Some(LedState::FlashGreen));
}

#[test]
fn deferred_reset_grace_expiry_is_a_no_op() {
    let mut board = RecordingBoard::with_marker();
    let mut monitor = start(&mut board);
    board.clear();

    monitor.handle(ControlEvent::GraceExpired(secs(2)), &mut board);

    assert_eq!(monitor.mode(), Mode::InUse);
    assert!(board.system_calls().is_empty());
    assert!(
        !board
            .events
            .iter()
            .any(|e| matches!(e, MonitorEvent::ModeChanged { .. }))
    );
}

#[test]
fn unreadable_marker_is_treated_as_absent() {
    let mut board = RecordingBoard {
        marker_fault: Some(io::ErrorKind::PermissionDenied),
        ..RecordingBoard::default()
    };
    let monitor = start(&mut board);

    assert_eq!(monitor.mode(), Mode::Startup);
    assert!(board.system_calls().is_empty());
    assert!(matches!(
        board.diagnostics().as_slice(),
        [Diagnostic::MarkerFailed(_)]
    ));
}

// ── IN_USE dispatch ───────────────────────────────────────────

#[test]
fn in_use_three_second_press_reboots_once() {
    let (mut monitor, mut board) = in_use();
    press_for(&mut monitor, &mut board, 100_000, 3_000);

    assert_eq!(board.system_calls(), vec![BoardCall::Reboot]);
    assert_eq!(board.count(BoardCall::CreateMarker), 0);
    assert_eq!(monitor.dispatched(), 1);
}

#[test]
fn in_use_seven_second_press_schedules_reset() {
    let (mut monitor, mut board) = in_use();
    press_for(&mut monitor, &mut board, 100_000, 7_000);

    assert!(board.marker);
    assert_eq!(board.count(BoardCall::CreateMarker), 1);
    assert!(board.system_calls().is_empty());
}

#[test]
fn in_use_twelve_second_press_shuts_down() {
    let (mut monitor, mut board) = in_use();
    press_for(&mut monitor, &mut board, 100_000, 12_000);

    assert_eq!(board.system_calls(), vec![BoardCall::Shutdown]);
    assert!(!board.marker);
}

#[test]
fn in_use_seventeen_second_press_cancels() {
    let (mut monitor, mut board) = in_use();
    press_for(&mut monitor, &mut board, 100_000, 17_000);

    assert!(board.system_calls().is_empty());
    assert_eq!(board.count(BoardCall::CreateMarker), 0);
    assert_eq!(board.last_led(), Some(LedState::FlashGreen));
    assert_eq!(monitor.last_led(), Some(LedState::FlashGreen));
}

#[test]
fn band_boundaries_select_the_upper_band() {
    for (held_ms, expected) in [
        (4_999, Action::Reboot),
        (5_000, Action::ScheduleReset),
        (10_000, Action::Shutdown),
        (15_000, Action::Cancel),
    ] {
        let (mut monitor, mut board) = in_use();
        press_for(&mut monitor, &mut board, 50_000, held_ms);
        let dispatched: Vec<Action> = board
            .events
            .iter()
            .filter_map(|e| match e {
                MonitorEvent::Dispatched { action, .. } => Some(*action),
                _ => None,
            })
            .collect();
        assert_eq!(dispatched, vec![expected], "held {held_ms} ms");
    }
}

#[test]
fn press_alone_dispatches_nothing() {
    let (mut monitor, mut board) = in_use();
    monitor.handle(ControlEvent::Edge(Edge::press(secs(40))), &mut board);

    assert!(monitor.is_held());
    assert_eq!(monitor.dispatched(), 0);
    assert!(board.system_calls().is_empty());
    assert_eq!(monitor.pending_action(secs(46)), Some(Action::ScheduleReset));
}

// ── Anomalies ─────────────────────────────────────────────────

#[test]
fn release_without_press_changes_nothing() {
    let mut board = RecordingBoard::new();
    let mut monitor = start(&mut board);
    board.clear();

    monitor.handle(ControlEvent::Edge(Edge::release(secs(3))), &mut board);

    assert_eq!(monitor.mode(), Mode::Startup);
    assert_eq!(monitor.dispatched(), 0);
    assert!(board.calls.is_empty());
    assert_eq!(
        board.diagnostics(),
        vec![&Diagnostic::InvalidRelease { at: secs(3) }]
    );
}

#[test]
fn second_press_keeps_the_original_start() {
    let (mut monitor, mut board) = in_use();
    monitor.handle(ControlEvent::Edge(Edge::press(secs(100))), &mut board);
    monitor.handle(ControlEvent::Edge(Edge::press(secs(102))), &mut board);
    monitor.handle(ControlEvent::Edge(Edge::release(secs(106))), &mut board);

    // 6 s from the first press, not 4 s from the second.
    assert_eq!(board.count(BoardCall::CreateMarker), 1);
    assert_eq!(board.count(BoardCall::Reboot), 0);
    assert!(board.diagnostics().contains(&&Diagnostic::PressWhileHeld {
        at: secs(102),
        since: secs(100)
    }));
}

#[test]
fn marker_write_failure_is_reported_and_press_still_completes() {
    let (mut monitor, mut board) = in_use();
    board.marker_fault = Some(io::ErrorKind::ReadOnlyFilesystem);
    press_for(&mut monitor, &mut board, 100_000, 7_000);

    assert_eq!(monitor.dispatched(), 1);
    assert!(!monitor.is_held());
    assert!(matches!(
        board.diagnostics().as_slice(),
        [Diagnostic::MarkerFailed(_)]
    ));
}

// ── STARTUP presses ───────────────────────────────────────────

#[test]
fn startup_short_press_is_user_factory_reset() {
    let mut board = RecordingBoard::new();
    let mut monitor = start(&mut board);
    press_for(&mut monitor, &mut board, 1_000, 2_000);

    assert_eq!(monitor.mode(), Mode::InUse);
    assert_eq!(
        board.system_calls(),
        vec![BoardCall::FactoryReset {
            requested_by_user: true
        }]
    );

    // The grace timer firing afterwards changes nothing.
    board.clear();
    monitor.handle(ControlEvent::GraceExpired(secs(10)), &mut board);
    assert!(board.system_calls().is_empty());
    assert_eq!(monitor.mode(), Mode::InUse);
}

#[test]
fn startup_long_press_uses_in_use_table_then_leaves_startup() {
    let mut board = RecordingBoard::new();
    let mut monitor = start(&mut board);
    press_for(&mut monitor, &mut board, 0, 6_000);

    assert_eq!(monitor.mode(), Mode::InUse);
    assert_eq!(board.count(BoardCall::CreateMarker), 1);
    assert!(board.system_calls().is_empty());
}

#[test]
fn startup_twelve_second_press_shuts_down_then_leaves_startup() {
    let mut board = RecordingBoard::new();
    let mut monitor = start(&mut board);
    press_for(&mut monitor, &mut board, 0, 12_000);

    assert_eq!(monitor.mode(), Mode::InUse);
    assert_eq!(board.system_calls(), vec![BoardCall::Shutdown]);
    assert_eq!(board.count(BoardCall::CreateMarker), 0);
}

#[test]
fn startup_seventeen_second_press_cancels_then_leaves_startup() {
    let mut board = RecordingBoard::new();
    let mut monitor = start(&mut board);
    press_for(&mut monitor, &mut board, 0, 17_000);

    assert_eq!(monitor.mode(), Mode::InUse);
    assert!(board.system_calls().is_empty());
    assert_eq!(board.count(BoardCall::CreateMarker), 0);
    assert_eq!(monitor.dispatched(), 1);
}

// ── LED feedback ──────────────────────────────────────────────

#[test]
fn led_follows_the_held_duration() {
    let (mut monitor, mut board) = in_use();
    monitor.handle(ControlEvent::Edge(Edge::press(secs(100))), &mut board);
    assert_eq!(board.last_led(), Some(LedState::Green));

    for (t, expected) in [
        (104, LedState::Green),
        (106, LedState::Red),
        (111, LedState::FlashRed),
        (116, LedState::FlashGreen),
    ] {
        monitor.handle(ControlEvent::Tick(secs(t)), &mut board);
        assert_eq!(board.last_led(), Some(expected), "at {t}s");
    }
}

#[test]
fn held_ticks_reissue_the_led_but_report_changes_once() {
    let (mut monitor, mut board) = in_use();
    monitor.handle(ControlEvent::Edge(Edge::press(secs(100))), &mut board);
    monitor.handle(ControlEvent::Tick(secs(101)), &mut board);
    monitor.handle(ControlEvent::Tick(secs(102)), &mut board);

    assert_eq!(board.led_calls(), 3);
    let reported = board
        .events
        .iter()
        .filter(|e| matches!(e, MonitorEvent::Led(_)))
        .count();
    assert_eq!(reported, 1);
}

#[test]
fn idle_ticks_leave_the_led_alone() {
    let (mut monitor, mut board) = in_use();
    for t in [12, 14, 16] {
        monitor.handle(ControlEvent::Tick(secs(t)), &mut board);
    }
    assert_eq!(board.led_calls(), 0);
}

#[test]
fn startup_hold_shows_red_until_medium_band() {
    let mut board = RecordingBoard::new();
    let mut monitor = start(&mut board);
    monitor.handle(ControlEvent::Edge(Edge::press(secs(0))), &mut board);
    assert_eq!(board.last_led(), Some(LedState::Red));
    monitor.handle(ControlEvent::Tick(secs(11)), &mut board);
    assert_eq!(board.last_led(), Some(LedState::FlashRed));
}
