//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger (UART on the device, stderr on the host).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] as one line.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started => info!("START | hvacmon {}", env!("CARGO_PKG_VERSION")),
            AppEvent::ReadingAcquired { reading, valid } => info!(
                "READ  | T={}\u{00b0}C P={}hPa H={}% | {}",
                reading.temperature,
                reading.pressure,
                reading.humidity,
                if *valid { "valid" } else { "OUT OF RANGE" }
            ),
            AppEvent::ModeChanged { from, to } => info!("MODE  | {} -> {}", from, to),
            AppEvent::Reported(report) => {
                let fields: heapless::Vec<&str, 3> =
                    report.fields.iter().map(|(f, _)| f.property()).collect();
                info!("TWIN  | {:?} mode={:?}", fields.as_slice(), report.mode);
            }
            AppEvent::TelemetryPublished { msg_id } => info!("TELEM | msgId={}", msg_id),
            AppEvent::TargetAccepted(target) => info!("CMD   | target={}\u{00b0}C", target),
            AppEvent::PanelMessageAccepted => info!("CMD   | panel message updated"),
            AppEvent::Rejected(rejection) => warn!("CMD   | rejected: {}", rejection),
            AppEvent::RestartScheduled { delay_secs } => info!("CMD   | restart in {}s", delay_secs),
            AppEvent::Restarting => info!("POWER | restarting"),
            AppEvent::OperatingLed(on) => info!("CMD   | HVAC {}", if *on { "on" } else { "off" }),
            AppEvent::ConnectionChanged(up) => {
                info!("NET   | {}", if *up { "connected" } else { "disconnected" });
            }
            AppEvent::UpdateDeferred { minutes } => info!("OTA   | deferred {} min", minutes),
        }
    }
}
