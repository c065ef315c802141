//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (sensor, indicators, cloud, clock, storage) implement
//! these traits.  The [`AppService`](super::service::AppService) consumes
//! them via generics, so the domain core never touches hardware or the
//! cloud SDK directly.

use serde::Serialize;

use crate::config::HvacConfig;
use crate::error::{CommsError, SensorError};
use crate::hvac::mode::Mode;
use crate::scheduler::TimerId;
use crate::telemetry::message::{MemoryUsage, TelemetryMessage};
use crate::telemetry::reading::Reading;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this once per acquisition cycle.
pub trait SensorPort {
    fn read(&mut self) -> Result<Reading, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Indicator port (driven adapter: domain → LEDs)
// ───────────────────────────────────────────────────────────────

pub trait IndicatorPort {
    /// Light the colour for `mode` and extinguish the previous one.
    fn show_mode(&mut self, mode: Mode);

    /// Network status LED.
    fn set_network_led(&mut self, on: bool);

    /// HVAC operating LED (driven by the `HvacOn` / `HvacOff` methods).
    fn set_operating_led(&mut self, on: bool);
}

// ───────────────────────────────────────────────────────────────
// System port (driven adapter: clock, memory, power)
// ───────────────────────────────────────────────────────────────

/// Capacity of a formatted UTC timestamp.
pub const UTC_CAPACITY: usize = 40;

pub trait SystemPort {
    /// Current UTC time as an ISO-8601 string.
    fn utc_now(&self) -> heapless::String<UTC_CAPACITY>;

    /// Current UTC hour-of-day.  `None` if the wall clock is not set.
    fn utc_hour(&self) -> Option<u8>;

    fn memory_usage(&self) -> MemoryUsage;

    /// Restart the device.  Only ever invoked from the restart timer.
    fn reboot(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Cloud port (driven adapter: domain → device twin / telemetry)
// ───────────────────────────────────────────────────────────────

/// A device twin property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TwinValue<'a> {
    Int(i32),
    Text(&'a str),
}

/// Acknowledgement status for a desired property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckStatus {
    Completed,
    Error,
}

impl AckStatus {
    /// IoT Plug and Play acknowledgement code.
    pub const fn code(self) -> u16 {
        match self {
            Self::Completed => 200,
            Self::Error => 500,
        }
    }
}

pub trait CloudPort {
    /// Publish one telemetry message.
    fn publish(&mut self, message: &TelemetryMessage) -> Result<(), CommsError>;

    /// Update a reported device twin property.
    fn report_property(&mut self, property: &str, value: TwinValue<'_>) -> Result<(), CommsError>;

    /// Acknowledge a desired property update.
    fn ack_desired(
        &mut self,
        property: &str,
        value: TwinValue<'_>,
        status: AckStatus,
    ) -> Result<(), CommsError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port
// ───────────────────────────────────────────────────────────────

/// Loads and persists system configuration.
///
/// Implementations MUST validate config values before persisting.
/// Invalid ranges are rejected with [`ConfigError::ValidationFailed`],
/// not silently clamped.
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    fn load(&self) -> Result<HvacConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &HvacConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Timer ports
// ───────────────────────────────────────────────────────────────

/// Arms one-shot timers.  Implemented by the
/// [`Scheduler`](crate::scheduler::Scheduler); the domain only needs this
/// narrow view to defer a restart.
pub trait OneShotTimer {
    /// Arm (or re-arm) `timer` to fire once after `delay_ms`.
    fn arm_one_shot(&mut self, timer: TimerId, delay_ms: u32);
}

/// Callback trait that the scheduler invokes when a timer fires.
///
/// This decouples the [`Scheduler`](crate::scheduler::Scheduler) from the
/// event queue: the device implements it by queueing a
/// [`Event::TimerFired`](crate::events::Event::TimerFired).
pub trait SchedulerDelegate {
    fn on_timer_fired(&mut self, timer: TimerId, kind: ScheduleFiredKind);
}

/// Discriminant passed to [`SchedulerDelegate::on_timer_fired`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleFiredKind {
    Periodic,
    /// Fired once and disarmed.
    OneShot,
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// No config found in storage (first boot).
    NotFound,
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for ConfigError {}
