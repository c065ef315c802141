//! Telemetry state: latest/previous readings, validity and mode tracking.
//!
//! `TelemetryState` is the single blackboard the acquisition, mode and
//! reporting steps work on.  It is owned by
//! [`AppService`](crate::app::service::AppService) and only mutated from
//! the event loop, so no synchronisation is involved.

pub mod message;
pub mod reading;

use heapless::Vec;

use crate::hvac::mode::{decide_mode, Mode};
use reading::{Reading, ReadingBounds};

// ---------------------------------------------------------------------------
// Reported fields
// ---------------------------------------------------------------------------

/// Environment fields mirrored to the device twin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Temperature,
    Pressure,
    Humidity,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Temperature, Field::Pressure, Field::Humidity];

    /// Device twin property name.
    pub const fn property(self) -> &'static str {
        match self {
            Self::Temperature => "Temperature",
            Self::Pressure => "Pressure",
            Self::Humidity => "Humidity",
        }
    }

    fn of(self, reading: &Reading) -> i32 {
        match self {
            Self::Temperature => reading.temperature,
            Self::Pressure => reading.pressure,
            Self::Humidity => reading.humidity,
        }
    }

    fn of_mut(self, reading: &mut Reading) -> &mut i32 {
        match self {
            Self::Temperature => &mut reading.temperature,
            Self::Pressure => &mut reading.pressure,
            Self::Humidity => &mut reading.humidity,
        }
    }
}

/// What one reporting tick found changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportSet {
    /// Changed environment fields with their new values, in report order.
    pub fields: Vec<(Field, i32), 3>,
    /// New mode, when it changed.
    pub mode: Option<Mode>,
}

impl ReportSet {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.mode.is_none()
    }

    /// Total number of twin reports this set stands for.
    pub fn len(&self) -> usize {
        self.fields.len() + usize::from(self.mode.is_some())
    }

    pub fn contains(&self, field: Field) -> bool {
        self.fields.iter().any(|(f, _)| *f == field)
    }
}

/// Edge trigger: strict inequality, no smoothing.
pub fn changed<T: PartialEq>(latest: &T, previous: &T) -> bool {
    latest != previous
}

// ---------------------------------------------------------------------------
// TelemetryState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct TelemetryState {
    pub latest: Reading,
    pub previous: Reading,
    /// Set by every acquisition, valid or not.
    pub updated: bool,
    /// Latest reading passed the bounds check.
    pub valid: bool,
    pub latest_mode: Mode,
    pub previous_mode: Mode,
    bounds: ReadingBounds,
}

impl Default for TelemetryState {
    fn default() -> Self {
        Self::new(ReadingBounds::default())
    }
}

impl TelemetryState {
    pub fn new(bounds: ReadingBounds) -> Self {
        Self {
            latest: Reading::new(0, 0, 0),
            previous: Reading::unreported(),
            updated: false,
            valid: false,
            latest_mode: Mode::Unknown,
            previous_mode: Mode::Unknown,
            bounds,
        }
    }

    /// Store a new reading and re-run the bounds check.
    /// Returns the validity of the reading.
    pub fn acquire(&mut self, reading: Reading) -> bool {
        self.latest = reading;
        self.updated = true;
        self.valid = self.bounds.validate(&reading);
        self.valid
    }

    /// Decide the mode for `target`, if a reading has been acquired.
    /// Returns the decided mode, or `None` when no decision was possible.
    pub fn evaluate_mode(&mut self, target: Option<i32>) -> Option<Mode> {
        let target = target?;
        if !self.updated {
            return None;
        }
        self.latest_mode = decide_mode(self.latest.temperature, target);
        Some(self.latest_mode)
    }

    /// Run the change detector over every field and the mode, moving each
    /// changed value into `previous`.
    pub fn take_changes(&mut self) -> ReportSet {
        let mut report = ReportSet::default();

        for field in Field::ALL {
            let latest = field.of(&self.latest);
            let previous = field.of_mut(&mut self.previous);
            if changed(&latest, &*previous) {
                *previous = latest;
                // Capacity equals Field::ALL.len().
                let _ = report.fields.push((field, latest));
            }
        }

        if self.latest_mode.is_known() && changed(&self.latest_mode, &self.previous_mode) {
            self.previous_mode = self.latest_mode;
            report.mode = Some(self.latest_mode);
        }

        report
    }
}
