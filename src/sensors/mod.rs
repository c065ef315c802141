//! Environment sensors.
//!
//! The lab board has no physical environment sensor, so readings come from
//! [`simulated::SimulatedSensor`] on every target.

pub mod simulated;

pub use simulated::SimulatedSensor;
