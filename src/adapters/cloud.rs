//! Log-backed cloud adapter.
//!
//! Implements [`CloudPort`] by rendering every outbound message the way
//! the IoT hub would receive it and writing it to the log.  The transport
//! itself (MQTT session, SAS tokens, retries) belongs to the platform SDK
//! and is not modelled here.

use log::{debug, info};

use crate::app::ports::{AckStatus, CloudPort, TwinValue};
use crate::error::CommsError;
use crate::telemetry::message::{CONTENT_ENCODING, CONTENT_TYPE, MESSAGE_PROPERTIES, TelemetryMessage};

/// Outbound traffic counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CloudStats {
    pub published: u32,
    pub reported: u32,
    pub acknowledged: u32,
}

#[derive(Default)]
pub struct LogCloud {
    stats: CloudStats,
}

impl LogCloud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> CloudStats {
        self.stats
    }

    fn json<T: serde::Serialize>(value: &T) -> Result<String, CommsError> {
        serde_json::to_string(value).map_err(|_| CommsError::PublishFailed)
    }
}

impl CloudPort for LogCloud {
    fn publish(&mut self, message: &TelemetryMessage) -> Result<(), CommsError> {
        let body = message.to_json()?;
        debug!(
            "D2C   | props={:?} content-type={} encoding={}",
            MESSAGE_PROPERTIES, CONTENT_TYPE, CONTENT_ENCODING
        );
        info!("D2C   | {}", body);
        self.stats.published += 1;
        Ok(())
    }

    fn report_property(&mut self, property: &str, value: TwinValue<'_>) -> Result<(), CommsError> {
        let patch = serde_json::json!({ property: value });
        info!("TWIN> | {}", Self::json(&patch).map_err(|_| CommsError::ReportFailed)?);
        self.stats.reported += 1;
        Ok(())
    }

    fn ack_desired(
        &mut self,
        property: &str,
        value: TwinValue<'_>,
        status: AckStatus,
    ) -> Result<(), CommsError> {
        // Plug and Play acknowledgement shape.
        let patch = serde_json::json!({
            property: { "value": value, "ac": status.code(), "av": 1 }
        });
        info!("TWIN> | {}", Self::json(&patch).map_err(|_| CommsError::ReportFailed)?);
        self.stats.acknowledged += 1;
        Ok(())
    }
}
