//! System actions backed by external commands.
//!
//! | Action          | Command                                   |
//! |-----------------|-------------------------------------------|
//! | reboot          | `reboot_command` (default `reboot`)       |
//! | shutdown        | `shutdown_command` (`shutdown -h now`)    |
//! | factory reset   | `<factory_reset_script> 1` or `... 0`     |
//!
//! All commands are spawned and left to run; reboot and shutdown end
//! the host, so there is nothing to wait for.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use log::{error, info};

use crate::app::ports::SystemActions;
use crate::config::MonitorConfig;

use super::utils::spawn_detached;

pub struct CommandActions {
    reboot: Vec<OsString>,
    shutdown: Vec<OsString>,
    factory_reset_script: PathBuf,
}

impl CommandActions {
    pub fn new(config: &MonitorConfig) -> Self {
        Self {
            reboot: config.reboot_command.iter().map(OsString::from).collect(),
            shutdown: config.shutdown_command.iter().map(OsString::from).collect(),
            factory_reset_script: config.factory_reset_script.clone(),
        }
    }

    fn run(label: &'static str, argv: &[OsString]) {
        info!("{label}: {argv:?}");
        if let Err(e) = spawn_detached(label, argv) {
            error!("{label}: could not start {argv:?}: {e}");
        }
    }
}

/// Command line for the factory-reset script. The trailing flag is an
/// argument of this call only: `1` when the user asked for the reset,
/// `0` when it comes from the persisted marker.
pub fn factory_reset_argv(script: &Path, requested_by_user: bool) -> Vec<OsString> {
    let flag = if requested_by_user { "1" } else { "0" };
    vec![script.into(), flag.into()]
}

impl SystemActions for CommandActions {
    fn reboot(&mut self) {
        Self::run("reboot", &self.reboot);
    }

    fn shutdown(&mut self) {
        Self::run("shutdown", &self.shutdown);
    }

    fn factory_reset(&mut self, requested_by_user: bool) {
        Self::run(
            "factory-reset",
            &factory_reset_argv(&self.factory_reset_script, requested_by_user),
        );
    }
}
