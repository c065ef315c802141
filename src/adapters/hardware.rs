//! Hardware adapter: bridges peripherals to domain port traits.
//!
//! Owns the environment sensor and the LED drivers, exposing them through
//! [`SensorPort`], [`IndicatorPort`] and [`SystemPort`].  This is the only
//! module that touches the board.  On non-espidf targets the drivers use
//! cfg-gated simulation stubs.

use chrono::{DateTime, Datelike, Timelike, Utc};
use log::warn;

use crate::app::ports::{IndicatorPort, SensorPort, SystemPort, UTC_CAPACITY};
use crate::drivers::mode_leds::ModeLeds;
use crate::drivers::status_led::StatusLed;
use crate::error::SensorError;
use crate::hvac::mode::Mode;
use crate::pins;
use crate::telemetry::message::MemoryUsage;
use crate::telemetry::reading::Reading;

/// Clocks earlier than this have not been set from the network yet.
const EARLIEST_SYNCED_YEAR: i32 = 2020;

pub struct HardwareAdapter<S> {
    sensor: S,
    mode_leds: ModeLeds,
    network_led: StatusLed,
    operating_led: StatusLed,
    reboot_requested: bool,
}

impl<S: SensorPort> HardwareAdapter<S> {
    pub fn new(sensor: S) -> Self {
        Self {
            sensor,
            mode_leds: ModeLeds::new(),
            network_led: StatusLed::new(pins::NETWORK_LED_GPIO),
            operating_led: StatusLed::new(pins::OPERATING_LED_GPIO),
            reboot_requested: false,
        }
    }

    /// Set once [`SystemPort::reboot`] has run on a host build.
    pub fn reboot_requested(&self) -> bool {
        self.reboot_requested
    }

    pub fn lit_mode(&self) -> Mode {
        self.mode_leds.lit()
    }

    pub fn network_led_lit(&self) -> bool {
        self.network_led.is_lit()
    }

    pub fn operating_led_lit(&self) -> bool {
        self.operating_led.is_lit()
    }

    fn synced_now() -> Option<DateTime<Utc>> {
        let now = Utc::now();
        (now.year() >= EARLIEST_SYNCED_YEAR).then_some(now)
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<S: SensorPort> SensorPort for HardwareAdapter<S> {
    fn read(&mut self) -> Result<Reading, SensorError> {
        self.sensor.read()
    }
}

// ── IndicatorPort implementation ──────────────────────────────

impl<S: SensorPort> IndicatorPort for HardwareAdapter<S> {
    fn show_mode(&mut self, mode: Mode) {
        self.mode_leds.show(mode);
    }

    fn set_network_led(&mut self, on: bool) {
        self.network_led.set(on);
    }

    fn set_operating_led(&mut self, on: bool) {
        self.operating_led.set(on);
    }
}

// ── SystemPort implementation ─────────────────────────────────

impl<S: SensorPort> SystemPort for HardwareAdapter<S> {
    fn utc_now(&self) -> heapless::String<UTC_CAPACITY> {
        let mut out = heapless::String::new();
        let stamp = Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
        if out.push_str(&stamp).is_err() {
            warn!("UTC timestamp truncated");
        }
        out
    }

    fn utc_hour(&self) -> Option<u8> {
        Self::synced_now().map(|now| now.hour() as u8)
    }

    #[cfg(target_os = "espidf")]
    fn memory_usage(&self) -> MemoryUsage {
        use esp_idf_svc::sys::{esp_get_minimum_free_heap_size, heap_caps_get_total_size, MALLOC_CAP_DEFAULT};
        // SAFETY: read-only heap statistics, callable from any task.
        let (total, min_free) =
            unsafe { (heap_caps_get_total_size(MALLOC_CAP_DEFAULT) as u32, esp_get_minimum_free_heap_size()) };
        MemoryUsage {
            peak_user_kib: total.saturating_sub(min_free) / 1024,
            total_kib: total / 1024,
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn memory_usage(&self) -> MemoryUsage {
        match std::fs::read_to_string("/proc/self/status") {
            Ok(status) => memory_from_status(&status),
            Err(e) => {
                log::debug!("memory_usage(sim): /proc/self/status unreadable: {}", e);
                MemoryUsage::default()
            }
        }
    }

    #[cfg(target_os = "espidf")]
    fn reboot(&mut self) {
        self.reboot_requested = true;
        // SAFETY: esp_restart never returns.
        unsafe { esp_idf_svc::sys::esp_restart() };
    }

    #[cfg(not(target_os = "espidf"))]
    fn reboot(&mut self) {
        log::info!("reboot(sim): restart requested");
        self.reboot_requested = true;
    }
}

/// Peak and current resident set from a `/proc/<pid>/status` body.
/// Missing or malformed lines count as zero.
#[cfg(not(target_os = "espidf"))]
fn memory_from_status(status: &str) -> MemoryUsage {
    let field = |name: &str| {
        status
            .lines()
            .find_map(|line| line.strip_prefix(name))
            .and_then(|rest| rest.trim().trim_end_matches("kB").trim().parse::<u32>().ok())
            .unwrap_or(0)
    };
    MemoryUsage {
        peak_user_kib: field("VmHWM:"),
        total_kib: field("VmRSS:"),
    }
}
