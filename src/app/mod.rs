//! Application core: pure domain logic, zero I/O.
//!
//! The business rules of the monitor: press timing, mode transitions, LED
//! feedback and action dispatch. All interaction with the board happens
//! through **port traits** defined in [`ports`], keeping this layer fully
//! testable without real hardware.

pub mod events;
pub mod ports;
pub mod service;
