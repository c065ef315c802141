//! Unified error types for the HVAC monitor firmware.
//!
//! A single `Error` enum for the failures that escalate to the device loop
//! (comms, handler binding, config); sensor failures stay local to the
//! acquisition path.  Variants are `Copy` so they can be
//! passed through handlers and logged without allocation.
//!
//! Rejections are a separate category: they are the *expected* outcome of a
//! remote request with out-of-range arguments and are answered upstream
//! (twin acknowledgement or method response) rather than escalated.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A cloud collaborator failed.
    Comms(CommsError),
    /// A handler could not be bound.
    Registry(RegistryError),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comms(e) => write!(f, "comms: {e}"),
            Self::Registry(e) => write!(f, "registry: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The sensor did not answer.
    ReadFailed,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFailed => write!(f, "read failed"),
        }
    }
}

// ---------------------------------------------------------------------------
// Rejections
// ---------------------------------------------------------------------------

/// Why a remote request was refused.  Carries the offending value so the
/// response text can echo it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Target temperature outside the accepted range.
    OutOfRangeTarget(i32),
    /// Restart delay outside the accepted range.
    OutOfRangeRestartDelay(i32),
    /// Panel message too long or not printable.
    InvalidPanelMessage,
    /// Payload has the wrong JSON type.
    InvalidPayload,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRangeTarget(v) => write!(f, "target temperature out of range: {v}"),
            Self::OutOfRangeRestartDelay(v) => write!(f, "restart delay out of range: {v}"),
            Self::InvalidPanelMessage => write!(f, "panel message too long or not printable"),
            Self::InvalidPayload => write!(f, "invalid payload type"),
        }
    }
}

// ---------------------------------------------------------------------------
// Communications errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommsError {
    NotConnected,
    PublishFailed,
    ReportFailed,
    /// Serialised message does not fit the fixed telemetry buffer.
    MessageTooLarge,
}

impl fmt::Display for CommsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConnected => write!(f, "cloud not connected"),
            Self::PublishFailed => write!(f, "telemetry publish failed"),
            Self::ReportFailed => write!(f, "device twin report failed"),
            Self::MessageTooLarge => write!(f, "telemetry message exceeds buffer"),
        }
    }
}

impl From<CommsError> for Error {
    fn from(e: CommsError) -> Self {
        Self::Comms(e)
    }
}

// ---------------------------------------------------------------------------
// Registry errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    /// A handler is already bound under this name.
    Duplicate(&'static str),
    /// The fixed-capacity table is full.
    Full,
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duplicate(name) => write!(f, "'{name}' already bound"),
            Self::Full => write!(f, "binding table full"),
        }
    }
}

impl From<RegistryError> for Error {
    fn from(e: RegistryError) -> Self {
        Self::Registry(e)
    }
}
