//! Environment reading and its plausibility check.

use serde::{Deserialize, Serialize};

use crate::config::{Bounds, HvacConfig};

/// Value used for `previous` fields before the first report, so the first
/// comparison against any real reading always registers as a change.
pub const UNREPORTED: i32 = i32::MAX;

/// One sample of the environment sensors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    /// °C
    pub temperature: i32,
    /// hPa
    pub pressure: i32,
    /// % relative humidity
    pub humidity: i32,
}

impl Reading {
    pub const fn new(temperature: i32, pressure: i32, humidity: i32) -> Self {
        Self {
            temperature,
            pressure,
            humidity,
        }
    }

    /// Sentinel reading held in `previous` until the first report.
    pub const fn unreported() -> Self {
        Self::new(UNREPORTED, UNREPORTED, UNREPORTED)
    }
}

/// Physical bounds a reading must fall within to be reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadingBounds {
    pub temperature: Bounds,
    pub pressure: Bounds,
    pub humidity: Bounds,
}

impl Default for ReadingBounds {
    fn default() -> Self {
        Self {
            temperature: Bounds::new(-20, 50),
            pressure: Bounds::new(800, 1200),
            humidity: Bounds::new(0, 100),
        }
    }
}

impl From<&HvacConfig> for ReadingBounds {
    fn from(config: &HvacConfig) -> Self {
        Self {
            temperature: config.temperature_bounds,
            pressure: config.pressure_bounds,
            humidity: config.humidity_bounds,
        }
    }
}

impl ReadingBounds {
    /// All three fields within their inclusive bounds.
    pub fn validate(&self, reading: &Reading) -> bool {
        self.temperature.contains(reading.temperature)
            && self.pressure.contains(reading.pressure)
            && self.humidity.contains(reading.humidity)
    }
}

/// Validate against the default physical bounds.
pub fn validate(reading: &Reading) -> bool {
    ReadingBounds::default().validate(reading)
}
