//! Inbound commands to the device.
//!
//! These represent requests from the outside world (cloud SDK callbacks,
//! the host console) that the [`Device`](super::device::Device) routes to
//! its bound handlers.

use crate::hvac::deferral::PendingUpdate;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// A desired device twin property was updated.
    DesiredProperty {
        name: String,
        value: serde_json::Value,
    },

    /// A direct method was invoked.
    DirectMethod {
        name: String,
        payload: serde_json::Value,
    },

    /// The cloud connection came up or went down.
    ConnectionChanged(bool),

    /// The OS asked how long to defer a pending update.
    UpdatePending(PendingUpdate),
}
