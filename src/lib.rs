//! HVAC lab monitor firmware library.
//!
//! Exposes the pure-logic modules for integration testing and the host
//! binary.  All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod hvac;
pub mod pins;
pub mod scheduler;
pub mod telemetry;

pub mod adapters;
pub mod drivers;
pub mod sensors;
