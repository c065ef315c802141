//! Mock adapters for integration tests.
//!
//! Record every port call so tests can assert on the full history
//! without touching GPIOs, the wall clock or a cloud session.

use std::collections::VecDeque;

use hvacmon::app::events::AppEvent;
use hvacmon::app::ports::{
    AckStatus, CloudPort, EventSink, IndicatorPort, SensorPort, SystemPort, TwinValue, UTC_CAPACITY,
};
use hvacmon::error::{CommsError, SensorError};
use hvacmon::hvac::mode::Mode;
use hvacmon::telemetry::message::{MemoryUsage, TelemetryMessage};
use hvacmon::telemetry::reading::Reading;

// ── Indicator call record ─────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorCall {
    ShowMode(Mode),
    NetworkLed(bool),
    OperatingLed(bool),
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    /// Readings returned in order; a read from an empty queue fails.
    pub readings: VecDeque<Reading>,
    pub calls: Vec<IndicatorCall>,
    pub utc_hour: Option<u8>,
    pub reboots: u32,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            readings: VecDeque::new(),
            calls: Vec::new(),
            utc_hour: Some(0),
            reboots: 0,
        }
    }

    pub fn with_readings(readings: &[Reading]) -> Self {
        let mut hw = Self::new();
        hw.readings.extend(readings.iter().copied());
        hw
    }

    pub fn modes_shown(&self) -> Vec<Mode> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                IndicatorCall::ShowMode(m) => Some(*m),
                _ => None,
            })
            .collect()
    }

    pub fn network_led(&self) -> Option<bool> {
        self.calls.iter().rev().find_map(|c| match c {
            IndicatorCall::NetworkLed(on) => Some(*on),
            _ => None,
        })
    }

    pub fn operating_led(&self) -> Option<bool> {
        self.calls.iter().rev().find_map(|c| match c {
            IndicatorCall::OperatingLed(on) => Some(*on),
            _ => None,
        })
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn read(&mut self) -> Result<Reading, SensorError> {
        self.readings.pop_front().ok_or(SensorError::ReadFailed)
    }
}

impl IndicatorPort for MockHardware {
    fn show_mode(&mut self, mode: Mode) {
        self.calls.push(IndicatorCall::ShowMode(mode));
    }

    fn set_network_led(&mut self, on: bool) {
        self.calls.push(IndicatorCall::NetworkLed(on));
    }

    fn set_operating_led(&mut self, on: bool) {
        self.calls.push(IndicatorCall::OperatingLed(on));
    }
}

impl SystemPort for MockHardware {
    fn utc_now(&self) -> heapless::String<UTC_CAPACITY> {
        let mut s = heapless::String::new();
        let _ = s.push_str("2026-03-01T00:00:00Z");
        s
    }

    fn utc_hour(&self) -> Option<u8> {
        self.utc_hour
    }

    fn memory_usage(&self) -> MemoryUsage {
        MemoryUsage {
            peak_user_kib: 64,
            total_kib: 256,
        }
    }

    fn reboot(&mut self) {
        self.reboots += 1;
    }
}

// ── MockCloud ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Owned {
    Int(i32),
    Text(String),
}

impl From<TwinValue<'_>> for Owned {
    fn from(v: TwinValue<'_>) -> Self {
        match v {
            TwinValue::Int(i) => Self::Int(i),
            TwinValue::Text(s) => Self::Text(s.to_string()),
        }
    }
}

#[derive(Default)]
pub struct MockCloud {
    pub published: Vec<TelemetryMessage>,
    pub reports: Vec<(String, Owned)>,
    pub acks: Vec<(String, Owned, AckStatus)>,
    /// Fail every call while set.
    pub offline: bool,
}

#[allow(dead_code)]
impl MockCloud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reported_names(&self) -> Vec<&str> {
        self.reports.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn clear(&mut self) {
        self.published.clear();
        self.reports.clear();
        self.acks.clear();
    }
}

impl CloudPort for MockCloud {
    fn publish(&mut self, message: &TelemetryMessage) -> Result<(), CommsError> {
        if self.offline {
            return Err(CommsError::NotConnected);
        }
        self.published.push(message.clone());
        Ok(())
    }

    fn report_property(&mut self, property: &str, value: TwinValue<'_>) -> Result<(), CommsError> {
        if self.offline {
            return Err(CommsError::NotConnected);
        }
        self.reports.push((property.to_string(), value.into()));
        Ok(())
    }

    fn ack_desired(
        &mut self,
        property: &str,
        value: TwinValue<'_>,
        status: AckStatus,
    ) -> Result<(), CommsError> {
        if self.offline {
            return Err(CommsError::NotConnected);
        }
        self.acks.push((property.to_string(), value.into(), status));
        Ok(())
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode_changes(&self) -> Vec<(Mode, Mode)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::ModeChanged { from, to } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
