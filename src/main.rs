//! HVAC lab monitor: main entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter        LogCloud     LogEventSink  NvsAdapter  │
//! │  (Sensor+Indicator+Sys) (CloudPort)  (EventSink)   (Config)    │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  Validate · Mode · Change reports · Acceptors          │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Device: Scheduler · EventQueue · handler registries           │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::time::Duration;

use anyhow::{anyhow, Result};
use log::{info, warn};

use hvacmon::adapters::cloud::LogCloud;
use hvacmon::adapters::hardware::HardwareAdapter;
use hvacmon::adapters::log_sink::LogEventSink;
use hvacmon::adapters::nvs::NvsAdapter;
use hvacmon::app::device::Device;
use hvacmon::app::ports::{ConfigError, ConfigPort};
use hvacmon::app::service::AppService;
use hvacmon::config::HvacConfig;
use hvacmon::drivers::hw_init;
#[cfg(not(target_os = "espidf"))]
use hvacmon::events::Event;
use hvacmon::sensors::SimulatedSensor;

// ── Logging ───────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
fn init_logging() -> Result<()> {
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
fn init_logging() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).try_init()?;
    Ok(())
}

// ── Configuration ─────────────────────────────────────────────

/// Stored config, else a JSON override file (host), else defaults.
/// A freshly chosen config is persisted for the next boot.
fn load_config(nvs: &NvsAdapter) -> Result<HvacConfig> {
    match nvs.load() {
        Ok(cfg) => {
            info!("Config loaded from NVS");
            return Ok(cfg);
        }
        Err(ConfigError::NotFound) => {}
        Err(e) => warn!("NVS config load failed ({}), falling back", e),
    }

    let config = match std::env::var("HVACMON_CONFIG") {
        Ok(path) => {
            let text = std::fs::read_to_string(&path)?;
            let cfg: HvacConfig =
                serde_json::from_str(&text).map_err(|e| anyhow!("{}: {}", path, e))?;
            info!("Config loaded from {}", path);
            cfg
        }
        Err(_) => HvacConfig::default(),
    };

    nvs.save(&config)?;
    Ok(config)
}

// ── Host console ──────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
fn spawn_console() -> std::sync::mpsc::Receiver<hvacmon::app::commands::AppCommand> {
    use hvacmon::adapters::console::parse_line;
    use std::io::BufRead;

    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            match parse_line(&line) {
                Ok(cmd) => {
                    if tx.send(cmd).is_err() {
                        break;
                    }
                }
                Err(hvacmon::adapters::console::ConsoleError::Empty) => {}
                Err(e) => warn!("console: {}: '{}'", e, line.trim()),
            }
        }
    });
    rx
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. Bootstrap ──────────────────────────────────────────
    init_logging()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  HVAC monitor v{}                  ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    hw_init::init_peripherals()?;

    // ── 2. Config ─────────────────────────────────────────────
    let nvs = NvsAdapter::new()?;
    let config = load_config(&nvs)?;
    let tick_ms = config.loop_tick_ms;

    // ── 3. Adapters + device ──────────────────────────────────
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| d.as_secs());
    let hw = HardwareAdapter::new(SimulatedSensor::new(seed));
    let app = AppService::new(config);
    let mut device = Device::new(app, hw, LogCloud::new(), LogEventSink::new())?;
    device.start()?;

    #[cfg(not(target_os = "espidf"))]
    let console = spawn_console();

    // The host has no IoT hub session; treat it as connected unless told otherwise.
    #[cfg(not(target_os = "espidf"))]
    {
        if std::env::var_os("HVACMON_OFFLINE").is_none() {
            device.post(Event::ConnectionChanged(true));
        }
    }

    info!("System ready. Entering event loop.");

    // ── 4. Event loop ─────────────────────────────────────────
    loop {
        std::thread::sleep(Duration::from_millis(u64::from(tick_ms)));

        #[cfg(not(target_os = "espidf"))]
        {
            while let Ok(cmd) = console.try_recv() {
                if let Some(response) = device.handle_command(cmd) {
                    println!("{} {}", response.status.code(), response.body());
                }
            }
        }

        if let Err(e) = device.tick(tick_ms) {
            return Err(anyhow!("fatal: {}", e));
        }

        if device.hw().reboot_requested() {
            info!("Restart requested, leaving event loop");
            return Ok(());
        }
    }
}
