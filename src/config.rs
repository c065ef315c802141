//! System configuration parameters
//!
//! All tunable parameters for the HVAC monitor.
//! Values can be overridden through the [`ConfigPort`](crate::app::ports::ConfigPort).

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// Longest restart delay a stored config may allow (seconds).
pub const MAX_RESTART_DELAY_SECS: i32 = 3_600;

/// Inclusive integer range used for every bounds check in the firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: i32,
    pub max: i32,
}

impl Bounds {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// `min <= value <= max`.
    pub const fn contains(&self, value: i32) -> bool {
        value >= self.min && value <= self.max
    }

    const fn is_ordered(&self) -> bool {
        self.min <= self.max
    }
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HvacConfig {
    // --- Timing ---
    /// Event loop tick (milliseconds)
    pub loop_tick_ms: u32,
    /// Sensor acquisition interval (milliseconds)
    pub read_interval_ms: u32,
    /// Telemetry publish interval (milliseconds)
    pub publish_interval_ms: u32,
    /// Device twin change-report interval (milliseconds)
    pub twin_update_interval_ms: u32,

    // --- Reading bounds ---
    /// Plausible temperature range (°C)
    pub temperature_bounds: Bounds,
    /// Plausible pressure range (hPa)
    pub pressure_bounds: Bounds,
    /// Plausible relative humidity range (%)
    pub humidity_bounds: Bounds,

    // --- Remote requests ---
    /// Accepted target temperature range (°C)
    pub target_bounds: Bounds,
    /// Accepted restart delay range (seconds)
    pub restart_delay_bounds: Bounds,

    // --- Deferred updates ---
    /// Offset from UTC to local time (hours)
    pub utc_offset_hours: i8,
    /// Local hours in which an OS update may start immediately
    pub update_window: Bounds,
    /// Minutes to defer an update outside the window
    pub update_defer_minutes: u32,
}

impl Default for HvacConfig {
    fn default() -> Self {
        Self {
            // Timing
            loop_tick_ms: 100,
            read_interval_ms: 4_000,
            publish_interval_ms: 5_000,
            twin_update_interval_ms: 15_000,

            // Reading bounds
            temperature_bounds: Bounds::new(-20, 50),
            pressure_bounds: Bounds::new(800, 1200),
            humidity_bounds: Bounds::new(0, 100),

            // Remote requests
            target_bounds: Bounds::new(0, 50),
            restart_delay_bounds: Bounds::new(3, 10),

            // Deferred updates (UTC+10)
            utc_offset_hours: 10,
            update_window: Bounds::new(1, 5),
            update_defer_minutes: 15,
        }
    }
}

impl HvacConfig {
    /// Range-check every field.  Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.loop_tick_ms == 0 {
            return Err(ConfigError::ValidationFailed("loop_tick_ms must be non-zero"));
        }
        if self.read_interval_ms < self.loop_tick_ms
            || self.publish_interval_ms < self.loop_tick_ms
            || self.twin_update_interval_ms < self.loop_tick_ms
        {
            return Err(ConfigError::ValidationFailed(
                "timer intervals must be at least one loop tick",
            ));
        }
        let ranges = [
            (self.temperature_bounds, "temperature_bounds"),
            (self.pressure_bounds, "pressure_bounds"),
            (self.humidity_bounds, "humidity_bounds"),
            (self.target_bounds, "target_bounds"),
            (self.restart_delay_bounds, "restart_delay_bounds"),
            (self.update_window, "update_window"),
        ];
        for (bounds, name) in ranges {
            if !bounds.is_ordered() {
                return Err(ConfigError::ValidationFailed(name));
            }
        }
        if self.restart_delay_bounds.min <= 0 {
            return Err(ConfigError::ValidationFailed(
                "restart delay must leave time for pending reports",
            ));
        }
        if self.restart_delay_bounds.max > MAX_RESTART_DELAY_SECS {
            return Err(ConfigError::ValidationFailed("restart_delay_bounds"));
        }
        if !(-12..=14).contains(&self.utc_offset_hours) {
            return Err(ConfigError::ValidationFailed("utc_offset_hours"));
        }
        if self.update_window.min < 0 || self.update_window.max > 23 {
            return Err(ConfigError::ValidationFailed("update_window"));
        }
        Ok(())
    }
}
