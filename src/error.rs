//! Unified error type for the push-button monitor.
//!
//! Errors fall into two classes. Resource acquisition failures at start-up
//! are fatal: the binary exits non-zero. Everything the control loop sees
//! afterwards (interrupted reads, bus hiccups, persistence failures) is
//! logged and the loop carries on. [`Error::is_fatal`] draws that line.

use core::fmt;
use std::io;

// ---------------------------------------------------------------------------
// Top-level monitor error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A device, bus or timer could not be acquired at start-up.
    Init(String),
    /// A read or write on an already-open resource failed.
    Io {
        context: &'static str,
        kind: io::ErrorKind,
    },
    /// An I2C transaction failed.
    Bus(String),
    /// Configuration is invalid or could not be loaded.
    Config(String),
    /// The edge source's producer has gone away for good.
    Disconnected,
}

impl Error {
    /// Wrap an I/O error with a short description of what was attempted.
    pub fn io(context: &'static str, err: &io::Error) -> Self {
        Self::Io {
            context,
            kind: err.kind(),
        }
    }

    /// Whether the control loop must stop on this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Init(_) | Self::Config(_) | Self::Disconnected)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Io { context, kind } => write!(f, "io: {context}: {kind}"),
            Self::Bus(msg) => write!(f, "bus: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Disconnected => write!(f, "edge source disconnected"),
        }
    }
}

impl std::error::Error for Error {}

impl From<MarkerError> for Error {
    fn from(e: MarkerError) -> Self {
        match e {
            MarkerError::Io(kind) => Self::Io {
                context: "reset marker",
                kind,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Reset marker errors
// ---------------------------------------------------------------------------

/// Errors from [`ResetMarker`](crate::app::ports::ResetMarker) operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerError {
    /// The backing store could not be read or written.
    Io(io::ErrorKind),
}

impl fmt::Display for MarkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(kind) => write!(f, "marker I/O error: {kind}"),
        }
    }
}

impl std::error::Error for MarkerError {}

impl From<io::Error> for MarkerError {
    fn from(e: io::Error) -> Self {
        Self::Io(e.kind())
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
