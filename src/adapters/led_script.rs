//! LED script adapter.
//!
//! The board's LED is driven by a shell script that takes one numeric
//! argument, the [`LedState`] code. A single worker thread owns the
//! script: requests are queued on a channel and run one at a time, each
//! waited for before the next starts.
//!
//! ```text
//!  set_led(state) ──▶ channel ──▶ led worker ──▶ <script> <code> (wait)
//! ```
//!
//! When several requests are queued the worker jumps to the newest, so
//! the last state asked for is always the last one shown.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};
use log::{debug, warn};

use crate::app::ports::LedSink;
use crate::error::{Error, Result};
use crate::policy::led::LedState;

pub struct ScriptLed {
    tx: Sender<LedState>,
    worker: JoinHandle<()>,
}

impl ScriptLed {
    /// Start the worker thread that owns `script`.
    pub fn start(script: impl Into<PathBuf>) -> Result<Self> {
        let script = script.into();
        let (tx, rx) = crossbeam_channel::unbounded();
        let worker = thread::Builder::new()
            .name("pb-led".into())
            .spawn(move || led_worker(&script, &rx))
            .map_err(|e| Error::Init(format!("spawn LED worker: {e}")))?;
        Ok(Self { tx, worker })
    }

    /// Close the queue and wait until every queued request has run.
    pub fn finish(self) {
        drop(self.tx);
        if self.worker.join().is_err() {
            warn!("LED worker panicked");
        }
    }
}

/// Command line for one LED request: `<script> <code>`.
pub fn led_argv(script: &Path, state: LedState) -> Vec<OsString> {
    vec![script.into(), state.code().to_string().into()]
}

impl LedSink for ScriptLed {
    fn set_led(&mut self, state: LedState) {
        if self.tx.send(state).is_err() {
            warn!("LED {state}: worker gone, request dropped");
        }
    }
}

fn led_worker(script: &Path, rx: &Receiver<LedState>) {
    while let Ok(mut state) = rx.recv() {
        while let Ok(newer) = rx.try_recv() {
            debug!("LED {state} superseded by {newer}");
            state = newer;
        }
        run_script(script, state);
    }
}

fn run_script(script: &Path, state: LedState) {
    let argv = led_argv(script, state);
    let status = Command::new(&argv[0])
        .args(&argv[1..])
        .stdin(Stdio::null())
        .status();
    match status {
        Ok(s) if s.success() => debug!("LED {state}: ok"),
        Ok(s) => warn!("LED {state}: {} exited with {s}", script.display()),
        Err(e) => warn!("LED {state}: {} failed: {e}", script.display()),
    }
}
