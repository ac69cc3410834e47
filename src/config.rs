//! Monitor configuration parameters
//!
//! All tunable parameters for the push-button monitor.
//! Defaults match the board's stock behaviour; any field can be
//! overridden from a JSON file (see [`MonitorConfig::load`]).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV: &str = "PB_MONITOR_CONFIG";

/// Configuration file consulted when [`CONFIG_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/pb-monitor.json";

/// Press-duration band boundaries, in whole seconds.
///
/// Each boundary is inclusive on its lower side: a press of exactly
/// `short_max_secs` already belongs to the medium band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Below this: reboot (IN_USE) or immediate factory reset (STARTUP).
    pub short_max_secs: u64,
    /// Below this: schedule a factory reset for the next boot.
    pub medium_max_secs: u64,
    /// Below this: shut down. At or above: cancel.
    pub long_max_secs: u64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            short_max_secs: 5,
            medium_max_secs: 10,
            long_max_secs: 15,
        }
    }
}

/// Input-event backend settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// `EV_KEY` code reported for the push-button (`BTN_0`).
    pub key_code: u16,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self { key_code: 256 }
    }
}

/// Register-poll backend settings: the button level is one bit of a
/// controller register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterConfig {
    /// 7-bit I2C address of the system controller.
    pub address: u8,
    /// Register holding the button level.
    pub register: u8,
    /// Bit(s) set while the button is held.
    pub mask: u8,
}

impl Default for RegisterConfig {
    fn default() -> Self {
        Self {
            address: 0x20,
            register: 0x0a,
            mask: 0x01,
        }
    }
}

/// Register write that stops the system controller from hard-resetting
/// the board itself when the push-button is held.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HwResetConfig {
    pub bus: PathBuf,
    pub address: u8,
    pub register: u8,
    pub value: u8,
}

impl Default for HwResetConfig {
    fn default() -> Self {
        Self {
            bus: PathBuf::from("/dev/i2c-0"),
            address: 0x20,
            register: 0x00,
            value: 0x00,
        }
    }
}

/// Core monitor configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    // --- Policy ---
    pub thresholds: Thresholds,
    /// Length of the STARTUP grace window (seconds)
    pub startup_grace_secs: u64,

    // --- Timing ---
    /// LED re-evaluation tick while the button is held (milliseconds)
    pub tick_interval_ms: u64,
    /// Register sampling period for the register-poll backend (milliseconds)
    pub poll_interval_ms: u64,

    // --- Persistence ---
    /// Marker file meaning "factory reset on next start-up"
    pub marker_path: PathBuf,

    // --- External collaborators ---
    /// LED script, called with a single numeric LED code
    pub led_script: PathBuf,
    /// Factory-reset script, called with `1` (user request) or `0`
    pub factory_reset_script: PathBuf,
    pub reboot_command: Vec<String>,
    pub shutdown_command: Vec<String>,

    // --- Backends ---
    pub input: InputConfig,
    pub register: RegisterConfig,
    /// `None` skips the hardware-reset disable at start-up.
    pub hw_reset: Option<HwResetConfig>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            startup_grace_secs: 10,

            tick_interval_ms: 2_000,
            poll_interval_ms: 100,

            marker_path: PathBuf::from("/opt/monitors/fc-set"),

            led_script: PathBuf::from("./set_led.sh"),
            factory_reset_script: PathBuf::from("/usr/local/bin/check-factory-reset.sh"),
            reboot_command: vec!["reboot".into()],
            shutdown_command: vec!["shutdown".into(), "-h".into(), "now".into()],

            input: InputConfig::default(),
            register: RegisterConfig::default(),
            hw_reset: Some(HwResetConfig::default()),
        }
    }
}

impl MonitorConfig {
    pub fn startup_grace(&self) -> Duration {
        Duration::from_secs(self.startup_grace_secs)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Parse and validate a JSON document. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::Config(format!("parse: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load the configuration from `path`.
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    /// Resolve the configuration source:
    /// `$PB_MONITOR_CONFIG`, then [`DEFAULT_CONFIG_PATH`], then defaults.
    pub fn load() -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            let path = PathBuf::from(path);
            return Ok((Self::from_file(&path)?, Some(path)));
        }
        let path = Path::new(DEFAULT_CONFIG_PATH);
        if path.exists() {
            return Ok((Self::from_file(path)?, Some(path.to_path_buf())));
        }
        Ok((Self::default(), None))
    }

    /// Reject configurations the monitor cannot run with.
    pub fn validate(&self) -> Result<()> {
        let t = &self.thresholds;
        if t.short_max_secs == 0 {
            return Err(Error::Config("thresholds.short_max_secs must be > 0".into()));
        }
        if !(t.short_max_secs < t.medium_max_secs && t.medium_max_secs < t.long_max_secs) {
            return Err(Error::Config(
                "thresholds must be strictly increasing (short < medium < long)".into(),
            ));
        }
        if self.tick_interval_ms == 0 {
            return Err(Error::Config("tick_interval_ms must be > 0".into()));
        }
        if self.poll_interval_ms == 0 {
            return Err(Error::Config("poll_interval_ms must be > 0".into()));
        }
        if self.marker_path.as_os_str().is_empty() {
            return Err(Error::Config("marker_path must not be empty".into()));
        }
        if self.led_script.as_os_str().is_empty()
            || self.factory_reset_script.as_os_str().is_empty()
        {
            return Err(Error::Config("script paths must not be empty".into()));
        }
        if self.reboot_command.is_empty() || self.shutdown_command.is_empty() {
            return Err(Error::Config("reboot/shutdown commands must not be empty".into()));
        }
        Ok(())
    }
}
