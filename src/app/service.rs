//! Application service: the hexagonal core.
//!
//! [`AppService`] owns the telemetry state, the accepted target and the
//! panel message.  It exposes the four evaluator operations
//! (`on_reading_acquired`, `on_target_temperature_requested`,
//! `on_restart_requested`, `on_periodic_report_tick`) plus the publish,
//! connection and LED requests.  All I/O flows through port traits passed
//! in at call sites, making the service testable with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌─────────────────────────┐ ──▶ CloudPort
//!                 │       AppService        │
//! IndicatorPort ◀─│ Validate · Mode · Delta  │ ──▶ EventSink
//!                 └─────────────────────────┘
//! ```

use core::fmt::Write as _;

use log::{debug, info, warn};

use crate::config::HvacConfig;
use crate::error::{CommsError, Rejection, SensorError};
use crate::hvac::deferral::{deferral_minutes, PendingUpdate};
use crate::hvac::mode::Mode;
use crate::hvac::panel::{accept_panel_message, PanelMessage};
use crate::hvac::restart::{validate_restart_delay_within, RestartDelay};
use crate::hvac::target::{accept_target_within, TargetTemperature};
use crate::scheduler::TimerId;
use crate::telemetry::message::{MemoryUsage, TelemetryMessage, MESSAGE_CAPACITY};
use crate::telemetry::reading::{Reading, ReadingBounds};
use crate::telemetry::{ReportSet, TelemetryState};

use super::events::AppEvent;
use super::ports::{
    AckStatus, CloudPort, EventSink, IndicatorPort, OneShotTimer, SensorPort, TwinValue,
};

// ── Device twin property names ────────────────────────────────

pub const PROP_TARGET_TEMPERATURE: &str = "TargetTemperature";
pub const PROP_PANEL_MESSAGE: &str = "PanelMessage";
pub const PROP_OPERATING_MODE: &str = "HvacOperatingMode";
pub const PROP_SOFTWARE_VERSION: &str = "HvacSoftwareVersion";
pub const PROP_START_UTC: &str = "HvacStartUtc";
pub const PROP_DEFERRED_UPDATE: &str = "DeferredUpdateRequest";

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

pub struct AppService {
    config: HvacConfig,
    telemetry: TelemetryState,
    target: Option<TargetTemperature>,
    /// Mode currently shown on the indicator LEDs.
    indicated_mode: Mode,
    panel: PanelMessage,
    next_msg_id: u32,
    connected: bool,
    startup_reported: bool,
    operating_led: bool,
    restart: Option<RestartDelay>,
}

impl AppService {
    pub fn new(config: HvacConfig) -> Self {
        let telemetry = TelemetryState::new(ReadingBounds::from(&config));
        Self {
            config,
            telemetry,
            target: None,
            indicated_mode: Mode::Unknown,
            panel: PanelMessage::new(),
            next_msg_id: 0,
            connected: false,
            startup_reported: false,
            operating_led: false,
            restart: None,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    pub fn start(&mut self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Started);
        info!(
            "AppService started (read every {}ms, report every {}ms)",
            self.config.read_interval_ms, self.config.twin_update_interval_ms
        );
    }

    // ── Acquisition ───────────────────────────────────────────

    /// Read the sensor and evaluate the reading.
    pub fn acquire<P: SensorPort + IndicatorPort>(
        &mut self,
        hw: &mut P,
        sink: &mut impl EventSink,
    ) -> Result<bool, SensorError> {
        let reading = hw.read().inspect_err(|e| warn!("Sensor read failed: {}", e))?;
        Ok(self.on_reading_acquired(reading, hw, sink))
    }

    /// Store a reading, run the bounds check, then re-decide the mode.
    /// Returns whether the reading is valid.
    pub fn on_reading_acquired(
        &mut self,
        reading: Reading,
        io: &mut impl IndicatorPort,
        sink: &mut impl EventSink,
    ) -> bool {
        let valid = self.telemetry.acquire(reading);
        if !valid {
            warn!(
                "Reading out of range: T={} P={} H={} (reporting suppressed)",
                reading.temperature, reading.pressure, reading.humidity
            );
        }
        sink.emit(&AppEvent::ReadingAcquired { reading, valid });
        self.update_mode(io, sink);
        valid
    }

    /// Re-decide the operating mode and switch the indicator on change.
    fn update_mode(&mut self, io: &mut impl IndicatorPort, sink: &mut impl EventSink) {
        let target = self.target.map(TargetTemperature::celsius);
        let Some(mode) = self.telemetry.evaluate_mode(target) else {
            return;
        };
        if mode != self.indicated_mode {
            let from = self.indicated_mode;
            self.indicated_mode = mode;
            io.show_mode(mode);
            info!("Operating mode {} -> {}", from, mode);
            sink.emit(&AppEvent::ModeChanged { from, to: mode });
        }
    }

    // ── Remote requests ───────────────────────────────────────

    /// Desired `TargetTemperature` received.  Accepted values are stored,
    /// acknowledged "completed" and drive an immediate mode decision;
    /// rejected values are acknowledged "error" and change nothing.
    pub fn on_target_temperature_requested(
        &mut self,
        value: i32,
        cloud: &mut impl CloudPort,
        io: &mut impl IndicatorPort,
        sink: &mut impl EventSink,
    ) -> Result<TargetTemperature, Rejection> {
        let outcome = accept_target_within(value, self.config.target_bounds);
        let status = match outcome {
            Ok(target) => {
                self.target = Some(target);
                info!("Target temperature set to {}", target.celsius());
                sink.emit(&AppEvent::TargetAccepted(target.celsius()));
                self.update_mode(io, sink);
                AckStatus::Completed
            }
            Err(rejection) => {
                warn!("Target temperature rejected: {}", rejection);
                sink.emit(&AppEvent::Rejected(rejection));
                AckStatus::Error
            }
        };
        if let Err(e) = cloud.ack_desired(PROP_TARGET_TEMPERATURE, TwinValue::Int(value), status) {
            warn!("Target temperature ack failed: {}", e);
        }
        outcome
    }

    /// Desired `PanelMessage` received.
    pub fn on_panel_message_requested(
        &mut self,
        text: &str,
        cloud: &mut impl CloudPort,
        sink: &mut impl EventSink,
    ) -> Result<(), Rejection> {
        let outcome = accept_panel_message(text);
        let status = match &outcome {
            Ok(message) => {
                self.panel.clone_from(message);
                info!("Virtual HVAC display panel message: {}", self.panel);
                sink.emit(&AppEvent::PanelMessageAccepted);
                AckStatus::Completed
            }
            Err(rejection) => {
                warn!("Panel message rejected: string too long or invalid data");
                sink.emit(&AppEvent::Rejected(*rejection));
                AckStatus::Error
            }
        };
        if let Err(e) = cloud.ack_desired(PROP_PANEL_MESSAGE, TwinValue::Text(text), status) {
            warn!("Panel message ack failed: {}", e);
        }
        outcome.map(|_| ())
    }

    /// Restart requested with a delay in seconds.  Accepted delays arm the
    /// one-shot restart timer; nothing is armed on rejection.
    pub fn on_restart_requested(
        &mut self,
        seconds: i32,
        timers: &mut impl OneShotTimer,
        sink: &mut impl EventSink,
    ) -> Result<RestartDelay, Rejection> {
        match validate_restart_delay_within(seconds, self.config.restart_delay_bounds) {
            Ok(delay) => {
                timers.arm_one_shot(TimerId::Restart, delay.millis());
                self.restart = Some(delay);
                info!("Restart scheduled in {}s", delay.secs());
                sink.emit(&AppEvent::RestartScheduled {
                    delay_secs: delay.secs(),
                });
                Ok(delay)
            }
            Err(rejection) => {
                warn!("Restart rejected: {}", rejection);
                sink.emit(&AppEvent::Rejected(rejection));
                Err(rejection)
            }
        }
    }

    /// Switch the operating LED (`HvacOn` / `HvacOff`).
    pub fn set_operating(&mut self, on: bool, io: &mut impl IndicatorPort, sink: &mut impl EventSink) {
        self.operating_led = on;
        io.set_operating_led(on);
        sink.emit(&AppEvent::OperatingLed(on));
    }

    // ── Reporting ─────────────────────────────────────────────

    /// Report every value that changed since the last report.  Nothing is
    /// reported while the reading is invalid or the cloud is offline.
    pub fn on_periodic_report_tick(
        &mut self,
        cloud: &mut impl CloudPort,
        sink: &mut impl EventSink,
    ) -> ReportSet {
        if !self.telemetry.valid || !self.connected {
            return ReportSet::default();
        }

        let report = self.telemetry.take_changes();
        for (field, value) in &report.fields {
            if let Err(e) = cloud.report_property(field.property(), TwinValue::Int(*value)) {
                warn!("Report of {} failed: {}", field.property(), e);
            }
        }
        if let Some(mode) = report.mode {
            if let Err(e) = cloud.report_property(PROP_OPERATING_MODE, TwinValue::Text(mode.as_str())) {
                warn!("Report of {} failed: {}", PROP_OPERATING_MODE, e);
            }
        }

        if !report.is_empty() {
            debug!("Reported {} twin value(s)", report.len());
            sink.emit(&AppEvent::Reported(report.clone()));
        }
        report
    }

    /// Publish the latest reading as a telemetry message.
    ///
    /// Returns the message id, or `None` when publishing was skipped
    /// (invalid reading or offline).  A message that overflows the fixed
    /// buffer is a fatal [`CommsError::MessageTooLarge`].
    pub fn publish_telemetry(
        &mut self,
        cloud: &mut impl CloudPort,
        memory: MemoryUsage,
        sink: &mut impl EventSink,
    ) -> Result<Option<u32>, CommsError> {
        if !self.telemetry.valid || !self.connected {
            return Ok(None);
        }

        let msg_id = self.next_msg_id;
        self.next_msg_id = self.next_msg_id.wrapping_add(1);

        let message = TelemetryMessage::new(msg_id, &self.telemetry.latest, memory);
        let json = message.to_json().inspect_err(|_| {
            warn!("JSON serialization failed: buffer of {} bytes too small", MESSAGE_CAPACITY);
        })?;
        debug!("{}", json);

        cloud.publish(&message)?;
        sink.emit(&AppEvent::TelemetryPublished { msg_id });
        Ok(Some(msg_id))
    }

    // ── Connectivity & platform ───────────────────────────────

    /// Track the cloud connection.  The first connection reports the
    /// firmware version and start time.
    pub fn on_connection_changed(
        &mut self,
        connected: bool,
        utc_now: &str,
        cloud: &mut impl CloudPort,
        sink: &mut impl EventSink,
    ) {
        if connected != self.connected {
            info!("Cloud {}", if connected { "connected" } else { "disconnected" });
            sink.emit(&AppEvent::ConnectionChanged(connected));
        }
        self.connected = connected;

        if connected && !self.startup_reported {
            self.startup_reported = true;
            let mut version = heapless::String::<64>::new();
            let _ = write!(version, "HVAC firmware: {}", env!("CARGO_PKG_VERSION"));
            for (property, value) in [(PROP_SOFTWARE_VERSION, version.as_str()), (PROP_START_UTC, utc_now)] {
                if let Err(e) = cloud.report_property(property, TwinValue::Text(value)) {
                    warn!("Startup report of {} failed: {}", property, e);
                }
            }
        }
    }

    /// Decide how long to defer a pending OS update and report the
    /// decision.  Without a wall clock the update is deferred.
    pub fn on_update_pending(
        &mut self,
        utc_hour: Option<u8>,
        utc_now: &str,
        update: PendingUpdate,
        cloud: &mut impl CloudPort,
        sink: &mut impl EventSink,
    ) -> u32 {
        let requested = utc_hour.map_or(self.config.update_defer_minutes, |hour| {
            deferral_minutes(hour, &self.config)
        });

        let mut text = heapless::String::<160>::new();
        let _ = write!(
            text,
            "Utc: {}, Type: {}, Status: {}, Max defer minutes: {}, Requested minutes: {}",
            utc_now, update.kind, update.status, update.max_deferral_minutes, requested
        );
        if let Err(e) = cloud.report_property(PROP_DEFERRED_UPDATE, TwinValue::Text(&text)) {
            warn!("Deferred update report failed: {}", e);
        }
        sink.emit(&AppEvent::UpdateDeferred { minutes: requested });
        requested
    }

    /// Restart timer fired.
    pub fn on_restart_due(&mut self, sink: &mut impl EventSink) {
        info!("Restart delay elapsed, rebooting");
        self.restart = None;
        sink.emit(&AppEvent::Restarting);
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn telemetry(&self) -> &TelemetryState {
        &self.telemetry
    }

    pub fn mode(&self) -> Mode {
        self.telemetry.latest_mode
    }

    pub fn target(&self) -> Option<TargetTemperature> {
        self.target
    }

    pub fn panel_message(&self) -> &str {
        &self.panel
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn is_operating(&self) -> bool {
        self.operating_led
    }

    pub fn pending_restart(&self) -> Option<RestartDelay> {
        self.restart
    }

    pub fn config(&self) -> &HvacConfig {
        &self.config
    }
}
