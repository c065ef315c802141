//! Telemetry message published to the cloud.
//!
//! The message body is JSON with camelCase keys and must fit the fixed
//! [`MESSAGE_CAPACITY`]-byte buffer; routing properties travel alongside
//! it so the hub can route without parsing the body.

use serde::Serialize;

use super::reading::Reading;
use crate::error::CommsError;

/// Size of the serialised telemetry buffer in bytes.
pub const MESSAGE_CAPACITY: usize = 256;

/// Application properties attached to every telemetry message.
pub const MESSAGE_PROPERTIES: [(&str, &str); 3] =
    [("appid", "hvac"), ("type", "telemetry"), ("schema", "1")];

pub const CONTENT_TYPE: &str = "application/json";
pub const CONTENT_ENCODING: &str = "utf-8";

/// Process memory figures included in each message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryUsage {
    pub peak_user_kib: u32,
    pub total_kib: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryMessage {
    pub msg_id: u32,
    pub temperature: i32,
    pub pressure: i32,
    pub humidity: i32,
    #[serde(rename = "peakUserMemoryKiB")]
    pub peak_user_memory_kib: u32,
    #[serde(rename = "totalMemoryKiB")]
    pub total_memory_kib: u32,
}

impl TelemetryMessage {
    pub fn new(msg_id: u32, reading: &Reading, memory: MemoryUsage) -> Self {
        Self {
            msg_id,
            temperature: reading.temperature,
            pressure: reading.pressure,
            humidity: reading.humidity,
            peak_user_memory_kib: memory.peak_user_kib,
            total_memory_kib: memory.total_kib,
        }
    }

    /// Serialise into a bounded string.
    pub fn to_json(&self) -> Result<heapless::String<MESSAGE_CAPACITY>, CommsError> {
        let body = serde_json::to_string(self).map_err(|_| CommsError::PublishFailed)?;
        heapless::String::try_from(body.as_str()).map_err(|_| CommsError::MessageTooLarge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_uses_wire_names() {
        let msg = TelemetryMessage::new(
            7,
            &Reading::new(23, 1001, 44),
            MemoryUsage {
                peak_user_kib: 120,
                total_kib: 300,
            },
        );
        let json = msg.to_json().unwrap();
        assert_eq!(
            json.as_str(),
            r#"{"msgId":7,"temperature":23,"pressure":1001,"humidity":44,"peakUserMemoryKiB":120,"totalMemoryKiB":300}"#
        );
    }

    #[test]
    fn worst_case_message_fits_buffer() {
        let msg = TelemetryMessage {
            msg_id: u32::MAX,
            temperature: i32::MIN,
            pressure: i32::MIN,
            humidity: i32::MIN,
            peak_user_memory_kib: u32::MAX,
            total_memory_kib: u32::MAX,
        };
        assert!(msg.to_json().is_ok());
    }
}
