//! Push-button monitor library.
//!
//! Exposes the monitor core, the policies and the Linux adapters for the
//! binary and for integration testing. Nothing in the core touches the
//! host directly; see [`app::ports`].

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod fsm;
pub mod policy;
pub mod runtime;
pub mod tracker;
