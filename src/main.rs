//! Push-button monitor: main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  InputEventSource | RegisterPollSource      MonotonicClock   │
//! │  (PressEdgeSource)                          (Clock)          │
//! │  LinuxBoard: ScriptLed · CommandActions ·                    │
//! │              FileResetMarker · LogEventSink                  │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ─────────────────      │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │              Monitor (pure logic)                      │  │
//! │  │  Tracker · Mode · LED policy · Dispatcher              │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! │                                                              │
//! │  ControlLoop (edges + ticker, single thread)                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn};

use pb_monitor::adapters::board::LinuxBoard;
use pb_monitor::adapters::board_init;
use pb_monitor::adapters::input_event::InputEventSource;
use pb_monitor::adapters::register_poll::RegisterPollSource;
use pb_monitor::adapters::time::MonotonicClock;
use pb_monitor::app::ports::PressEdgeSource;
use pb_monitor::app::service::Monitor;
use pb_monitor::config::MonitorConfig;
use pb_monitor::runtime::ControlLoop;

/// Watch the board push button and turn press lengths into system actions.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Input event device (`/dev/input/eventN`) or I2C bus (`/dev/i2c-N`)
    /// of the system controller.
    device: PathBuf,
}

fn is_i2c_bus(path: &Path) -> bool {
    path.to_str().is_some_and(|p| p.starts_with("/dev/i2c"))
}

fn main() -> Result<()> {
    // Usage errors exit before logging is up, with clap's own message.
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    run(&cli).inspect_err(|e| error!("fatal: {e:#}"))
}

fn run(cli: &Cli) -> Result<()> {
    info!("pb-monitor v{}", env!("CARGO_PKG_VERSION"));

    // ── 1. Configuration ──────────────────────────────────────
    let (config, source) = MonitorConfig::load().context("loading configuration")?;
    match source {
        Some(path) => info!("config loaded from {}", path.display()),
        None => info!("no config file, using defaults"),
    }

    // ── 2. Board preparation ──────────────────────────────────
    if let Some(hw) = &config.hw_reset {
        let mut bus = linux_embedded_hal::I2cdev::new(&hw.bus)
            .with_context(|| format!("opening {}", hw.bus.display()))?;
        if let Err(e) = board_init::disable_hardware_reset(&mut bus, hw) {
            warn!("could not disable hardware reset: {e}");
        }
    }
    let mut board = LinuxBoard::new(&config)?;
    board_init::prepare_marker_dir(board.marker())?;

    // ── 3. Edge source ────────────────────────────────────────
    let clock = MonotonicClock::new();
    if is_i2c_bus(&cli.device) {
        let bus = linux_embedded_hal::I2cdev::new(&cli.device)
            .with_context(|| format!("opening {}", cli.device.display()))?;
        info!("polling controller register on {}", cli.device.display());
        let source = RegisterPollSource::new(bus, clock, config.register, config.poll_interval());
        serve(source, clock, &config, &mut board)
    } else {
        let source = InputEventSource::open(&cli.device, config.input.key_code, clock)?;
        info!("reading key events from {}", cli.device.display());
        serve(source, clock, &config, &mut board)
    }
}

/// Start the monitor and run the control loop until a fatal error.
fn serve<S: PressEdgeSource>(
    source: S,
    clock: MonotonicClock,
    config: &MonitorConfig,
    board: &mut LinuxBoard,
) -> Result<()> {
    let mut monitor = Monitor::start(config, board);
    let mut control = ControlLoop::new(source, clock, &monitor, config.tick_interval());
    info!("monitor ready, entering control loop");
    control
        .run(&mut monitor, board)
        .context("edge source failed")
}
