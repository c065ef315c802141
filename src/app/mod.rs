//! Application core.
//!
//! [`service`] holds the HVAC business rules: reading validation, mode
//! decision, change reporting and the remote request acceptors.  All
//! interaction with hardware and the cloud happens through **port traits**
//! defined in [`ports`], keeping the service testable without peripherals.
//! [`device`] wraps the service in the scheduler and handler registries
//! that drive it at runtime.

pub mod bindings;
pub mod commands;
pub mod device;
pub mod events;
pub mod ports;
pub mod service;
