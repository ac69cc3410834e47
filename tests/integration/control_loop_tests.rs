//! Integration tests for the control loop: edge source, ticker and
//! monitor driven together against a fake clock.

use std::thread;
use std::time::Duration;

use pb_monitor::adapters::input_event::InputEventSource;
use pb_monitor::adapters::time::MonotonicClock;
use pb_monitor::app::events::{Diagnostic, MonitorEvent};
use pb_monitor::app::ports::Clock;
use pb_monitor::app::service::Monitor;
use pb_monitor::config::MonitorConfig;
use pb_monitor::error::Error;
use pb_monitor::events::Edge;
use pb_monitor::fsm::Mode;
use pb_monitor::policy::led::LedState;
use pb_monitor::runtime::ControlLoop;

use super::mock_hw::{BoardCall, FakeClock, RecordingBoard, ScriptedSource, Step, secs};

struct Rig {
    clock: FakeClock,
    board: RecordingBoard,
    monitor: Monitor,
    control: ControlLoop<ScriptedSource, FakeClock>,
}

fn rig(board: RecordingBoard, steps: impl IntoIterator<Item = Step>) -> Rig {
    let config = MonitorConfig::default();
    let clock = FakeClock::new();
    let mut board = board;
    let monitor = Monitor::start(&config, &mut board);
    let source = ScriptedSource::new(clock.clone(), steps);
    let control = ControlLoop::new(source, clock.clone(), &monitor, config.tick_interval());
    Rig {
        clock,
        board,
        monitor,
        control,
    }
}

impl Rig {
    fn step(&mut self) -> Result<(), Error> {
        self.control.run_once(&mut self.monitor, &mut self.board)
    }

    /// Run until the script is exhausted.
    fn run_to_end(&mut self) {
        let err = self
            .control
            .run(&mut self.monitor, &mut self.board)
            .unwrap_err();
        assert_eq!(err, Error::Disconnected);
    }
}

#[test]
fn grace_expires_when_no_press_arrives() {
    let mut rig = rig(RecordingBoard::new(), [Step::Edge(Edge::press(secs(30)))]);

    rig.step().unwrap();

    assert_eq!(rig.clock.now_secs(), 10);
    assert_eq!(rig.monitor.mode(), Mode::InUse);
    assert_eq!(rig.board.last_led(), Some(LedState::FlashGreen));
    assert!(rig.board.system_calls().is_empty());
}

#[test]
fn press_cycle_after_grace_reboots() {
    let mut rig = rig(
        RecordingBoard::new(),
        [
            Step::Edge(Edge::press(secs(20))),
            Step::Edge(Edge::release(secs(23))),
        ],
    );
    rig.run_to_end();

    assert_eq!(rig.monitor.mode(), Mode::InUse);
    assert_eq!(rig.board.system_calls(), vec![BoardCall::Reboot]);
    assert_eq!(rig.monitor.dispatched(), 1);
}

#[test]
fn ticks_drive_led_feedback_while_held() {
    let mut rig = rig(
        RecordingBoard::new(),
        [
            Step::Edge(Edge::press(secs(12))),
            Step::Edge(Edge::release(secs(25))),
        ],
    );
    rig.run_to_end();

    let leds: Vec<LedState> = rig
        .board
        .events
        .iter()
        .filter_map(|e| match e {
            MonitorEvent::Led(s) => Some(*s),
            _ => None,
        })
        .collect();
    assert_eq!(
        leds,
        vec![
            LedState::Red,
            LedState::FlashGreen,
            LedState::Green,
            LedState::Red,
            LedState::FlashRed,
            LedState::FlashGreen,
        ]
    );
    assert_eq!(rig.board.system_calls(), vec![BoardCall::Shutdown]);
}

#[test]
fn marker_boot_arms_the_regular_tick() {
    let rig = rig(RecordingBoard::with_marker(), []);
    assert_eq!(rig.control.ticker().next_deadline(), secs(2));
    assert_eq!(rig.monitor.mode(), Mode::InUse);
}

#[test]
fn transient_source_error_is_reported_and_survived() {
    let mut rig = rig(
        RecordingBoard::new(),
        [
            Step::Fail(Error::Bus("nack".into())),
            Step::Edge(Edge::press(secs(1))),
            Step::Edge(Edge::release(secs(2))),
        ],
    );
    rig.run_to_end();

    assert!(matches!(
        rig.board.diagnostics().as_slice(),
        [Diagnostic::SourceError(_)]
    ));
    assert_eq!(
        rig.board.system_calls(),
        vec![BoardCall::FactoryReset {
            requested_by_user: true
        }]
    );
}

#[test]
fn disconnect_stops_the_loop() {
    let mut rig = rig(RecordingBoard::new(), [Step::Fail(Error::Disconnected)]);
    assert_eq!(rig.step(), Err(Error::Disconnected));
    assert_eq!(rig.monitor.mode(), Mode::Startup);
}

#[test]
fn wait_never_overshoots_the_next_deadline() {
    let mut rig = rig(RecordingBoard::new(), [Step::Edge(Edge::press(secs(100)))]);
    for expected in [10, 12, 14, 16] {
        rig.step().unwrap();
        assert_eq!(rig.clock.now_secs(), expected);
    }
    assert_eq!(
        rig.control.ticker().until_next(rig.clock.now()),
        Duration::from_secs(2)
    );
}

/// The evdev reader thread returns when the device node disappears
/// (`ENODEV`) or the control loop has dropped its receiver; either way
/// its sender is dropped with it. Edges already queued are still handled
/// before the loop stops.
#[test]
fn input_reader_exit_stops_the_loop() {
    let (tx, rx) = crossbeam_channel::unbounded();
    let reader = thread::spawn(move || {
        tx.send(Edge::press(secs(0))).unwrap();
        tx.send(Edge::release(secs(1))).unwrap();
    });
    let source = InputEventSource::from_channel(rx, reader);

    let config = MonitorConfig::default();
    let clock = MonotonicClock::new();
    let mut board = RecordingBoard::new();
    let mut monitor = Monitor::start(&config, &mut board);
    let mut control = ControlLoop::new(source, clock, &monitor, config.tick_interval());

    let err = control.run(&mut monitor, &mut board).unwrap_err();

    assert_eq!(err, Error::Disconnected);
    assert!(err.is_fatal());
    assert_eq!(
        board.system_calls(),
        vec![BoardCall::FactoryReset {
            requested_by_user: true
        }]
    );
}
