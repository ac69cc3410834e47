//! Kernel input-event edge source (`/dev/input/event*`).
//!
//! A reader thread blocks on the evdev device and forwards button edges,
//! stamped on arrival, over a channel. [`PressEdgeSource::poll`] is then a
//! bounded receive on that channel, so the control loop's wait never
//! exceeds its timeout even though the device read itself cannot time out.
//!
//! ```text
//!  evdev fd ──▶ reader thread ──▶ crossbeam channel ──▶ poll(timeout)
//! ```
//!
//! Only `EV_KEY` events for the configured key code count: value `1` is a
//! press, `0` a release, `2` (autorepeat) is dropped.

use std::io;
use std::path::Path;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use evdev::{Device, EventType};
use log::{debug, error, info, warn};

use crate::app::ports::{Clock, PressEdgeSource};
use crate::error::{Error, Result};
use crate::events::{Edge, EdgeKind};

/// Pause after an unexpected read error before trying again.
const READ_RETRY_DELAY: Duration = Duration::from_millis(200);

/// `ENODEV`: the device node went away (unplugged, driver unbound).
const ENODEV: i32 = 19;

pub struct InputEventSource {
    rx: Receiver<Edge>,
    _reader: JoinHandle<()>,
}

impl InputEventSource {
    /// Open `path` and start the reader thread.
    pub fn open<C>(path: &Path, key_code: u16, clock: C) -> Result<Self>
    where
        C: Clock + Send + 'static,
    {
        let device = Device::open(path)
            .map_err(|e| Error::Init(format!("open {}: {e}", path.display())))?;
        info!(
            "input device {} ({}) key code {}",
            path.display(),
            device.name().unwrap_or("unnamed"),
            key_code
        );

        let (tx, rx) = crossbeam_channel::unbounded();
        let reader = thread::Builder::new()
            .name("pb-input".into())
            .spawn(move || read_loop(device, key_code, &clock, &tx))
            .map_err(|e| Error::Init(format!("spawn input reader: {e}")))?;

        Ok(Self {
            rx,
            _reader: reader,
        })
    }

    /// Build a source fed by an existing channel (tests, alternative readers).
    pub fn from_channel(rx: Receiver<Edge>, reader: JoinHandle<()>) -> Self {
        Self {
            rx,
            _reader: reader,
        }
    }
}

impl PressEdgeSource for InputEventSource {
    fn poll(&mut self, timeout: Duration) -> Result<Option<Edge>> {
        match self.rx.recv_timeout(timeout) {
            Ok(edge) => Ok(Some(edge)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(Error::Disconnected),
        }
    }
}

/// Map a key event to an edge direction, if it is one.
pub fn key_edge(code: u16, value: i32, key_code: u16) -> Option<EdgeKind> {
    if code != key_code {
        return None;
    }
    match value {
        1 => Some(EdgeKind::Press),
        0 => Some(EdgeKind::Release),
        _ => None,
    }
}

fn read_loop(mut device: Device, key_code: u16, clock: &impl Clock, tx: &Sender<Edge>) {
    loop {
        let events = match device.fetch_events() {
            Ok(events) => events,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) if e.raw_os_error() == Some(ENODEV) => {
                error!("input device gone: {e}");
                return;
            }
            Err(e) => {
                warn!("input read error: {e}");
                thread::sleep(READ_RETRY_DELAY);
                continue;
            }
        };

        for ev in events {
            if ev.event_type() != EventType::KEY {
                continue;
            }
            let Some(kind) = key_edge(ev.code(), ev.value(), key_code) else {
                continue;
            };
            let edge = Edge {
                kind,
                at: clock.now(),
            };
            debug!("input edge {:?} at {}", edge.kind, edge.at);
            if tx.send(edge).is_err() {
                // Control loop gone; nothing left to feed.
                return;
            }
        }
    }
}
