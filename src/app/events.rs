//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them (serial log, test recorder, ...).

use crate::error::Rejection;
use crate::hvac::mode::Mode;
use crate::telemetry::ReportSet;
use crate::telemetry::reading::Reading;

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The application service has started.
    Started,

    /// A reading was stored; `valid` is the bounds check result.
    ReadingAcquired { reading: Reading, valid: bool },

    /// The indicated operating mode changed.
    ModeChanged { from: Mode, to: Mode },

    /// Changed values were reported to the device twin.
    Reported(ReportSet),

    /// A telemetry message was published.
    TelemetryPublished { msg_id: u32 },

    /// A new target temperature was accepted.
    TargetAccepted(i32),

    /// A new panel message was accepted.
    PanelMessageAccepted,

    /// A remote request was refused.
    Rejected(Rejection),

    /// A restart timer was armed.
    RestartScheduled { delay_secs: u32 },

    /// The restart timer fired.
    Restarting,

    /// The operating LED was switched by a direct method.
    OperatingLed(bool),

    /// Cloud connection state changed.
    ConnectionChanged(bool),

    /// A pending OS update was deferred by this many minutes (0 = now).
    UpdateDeferred { minutes: u32 },
}
