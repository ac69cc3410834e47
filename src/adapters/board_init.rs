//! One-time board preparation before monitoring starts.
//!
//! - Tell the system controller not to hard-reset the board itself on a
//!   push-button hold, so long presses reach this monitor.
//! - Make sure the directory holding the reset marker exists.

use embedded_hal::i2c::{Error as _, I2c};
use log::info;

use crate::config::HwResetConfig;
use crate::error::{Error, Result};

use super::marker_file::FileResetMarker;

/// Write `cfg.value` to `cfg.register` of the controller at `cfg.address`.
pub fn disable_hardware_reset<I: I2c>(i2c: &mut I, cfg: &HwResetConfig) -> Result<()> {
    i2c.write(cfg.address, &[cfg.register, cfg.value])
        .map_err(|e| {
            Error::Bus(format!(
                "write 0x{:02x} to 0x{:02x}@0x{:02x}: {:?}",
                cfg.value,
                cfg.register,
                cfg.address,
                e.kind()
            ))
        })?;
    info!(
        "push-button hardware reset disabled (0x{:02x}@0x{:02x} = 0x{:02x})",
        cfg.register, cfg.address, cfg.value
    );
    Ok(())
}

/// Create the marker directory. Failure here is an acquisition failure.
pub fn prepare_marker_dir(marker: &FileResetMarker) -> Result<()> {
    marker.ensure_dir().map_err(|e| {
        Error::Init(format!(
            "create marker directory for {}: {e}",
            marker.path().display()
        ))
    })
}
