//! System-controller register-poll edge source (I2C).
//!
//! The button level is one bit of a controller register. [`poll`] samples
//! it every `poll_interval` until the level changes or the timeout runs
//! out, and reports the change as a press or release edge. The initial
//! level is assumed released, so a button already held when the monitor
//! starts produces a press on the first sample.
//!
//! Generic over [`embedded_hal::i2c::I2c`]; on the board this is
//! `linux_embedded_hal::I2cdev` on `/dev/i2c-*`.
//!
//! [`poll`]: PressEdgeSource::poll

use std::thread;
use std::time::Duration;

use embedded_hal::i2c::{Error as _, I2c};
use log::debug;

use crate::app::ports::{Clock, PressEdgeSource};
use crate::config::RegisterConfig;
use crate::error::{Error, Result};
use crate::events::{Edge, EdgeKind};

pub struct RegisterPollSource<I, C> {
    i2c: I,
    clock: C,
    reg: RegisterConfig,
    interval: Duration,
    pressed: bool,
}

impl<I: I2c, C: Clock> RegisterPollSource<I, C> {
    pub fn new(i2c: I, clock: C, reg: RegisterConfig, interval: Duration) -> Self {
        Self {
            i2c,
            clock,
            reg,
            interval,
            pressed: false,
        }
    }

    fn read_level(&mut self) -> Result<bool> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.reg.address, &[self.reg.register], &mut buf)
            .map_err(|e| {
                Error::Bus(format!(
                    "read 0x{:02x}@0x{:02x}: {:?}",
                    self.reg.register,
                    self.reg.address,
                    e.kind()
                ))
            })?;
        Ok(buf[0] & self.reg.mask != 0)
    }

    /// Record a sampled level; returns the edge if it changed.
    fn update(&mut self, level: bool) -> Option<EdgeKind> {
        if level == self.pressed {
            return None;
        }
        self.pressed = level;
        Some(if level {
            EdgeKind::Press
        } else {
            EdgeKind::Release
        })
    }
}

impl<I: I2c, C: Clock> PressEdgeSource for RegisterPollSource<I, C> {
    fn poll(&mut self, timeout: Duration) -> Result<Option<Edge>> {
        let deadline = self.clock.now().saturating_add(timeout);
        loop {
            let level = self.read_level()?;
            let now = self.clock.now();
            if let Some(kind) = self.update(level) {
                debug!("register edge {:?} at {}", kind, now);
                return Ok(Some(Edge { kind, at: now }));
            }
            let remaining = deadline.saturating_since(now);
            if remaining.is_zero() {
                return Ok(None);
            }
            thread::sleep(remaining.min(self.interval));
        }
    }
}
