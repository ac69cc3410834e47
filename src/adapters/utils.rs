//! Shared helpers for the process-spawning adapters.

use std::ffi::OsString;
use std::io;
use std::process::{Command, Stdio};
use std::thread;

use log::{debug, warn};

/// Start `argv` without waiting for it.
///
/// A detached reaper thread collects the exit status and logs it, so the
/// caller never blocks and no zombie is left behind.
pub(super) fn spawn_detached(label: &'static str, argv: &[OsString]) -> io::Result<()> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty command"))?;

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .spawn()?;

    let pid = child.id();
    debug!("{label}: spawned pid {pid}");
    thread::Builder::new()
        .name(format!("reap-{label}"))
        .spawn(move || match child.wait() {
            Ok(status) if status.success() => debug!("{label}: pid {pid} exited ok"),
            Ok(status) => warn!("{label}: pid {pid} exited with {status}"),
            Err(e) => warn!("{label}: wait on pid {pid} failed: {e}"),
        })?;
    Ok(())
}
