//! Host console adapter.
//!
//! Stands in for the cloud SDK callbacks on the host: each stdin line is
//! parsed into an [`AppCommand`].
//!
//! ```text
//! target 22                 desired TargetTemperature = 22
//! panel Service due Friday  desired PanelMessage = "Service due Friday"
//! desired <name> <json>     any desired property
//! method HvacRestart 5      direct method with JSON payload (default null)
//! connect | disconnect      cloud connection status
//! update 60 [app|system] [pending|final|deferred|complete]
//!                           OS update notice, max deferral in minutes
//! ```

use serde_json::Value;

use crate::app::commands::AppCommand;
use crate::app::service::{PROP_PANEL_MESSAGE, PROP_TARGET_TEMPERATURE};
use crate::hvac::deferral::PendingUpdate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleError {
    Empty,
    UnknownVerb,
    MissingArgument,
    BadJson,
}

impl core::fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty line"),
            Self::UnknownVerb => write!(f, "unknown command"),
            Self::MissingArgument => write!(f, "missing argument"),
            Self::BadJson => write!(f, "argument is not valid JSON"),
        }
    }
}

fn json(text: &str) -> Result<Value, ConsoleError> {
    serde_json::from_str(text).map_err(|_| ConsoleError::BadJson)
}

/// `<minutes> [kind] [status]`; kind and status default to a pending
/// system update.
fn update(rest: &str) -> Result<PendingUpdate, ConsoleError> {
    let mut args = rest.split_whitespace();
    let minutes = args.next().ok_or(ConsoleError::MissingArgument)?;
    let mut update = PendingUpdate::system(minutes.parse().map_err(|_| ConsoleError::BadJson)?);
    if let Some(kind) = args.next() {
        update.kind = kind.parse().map_err(|_| ConsoleError::BadJson)?;
    }
    if let Some(status) = args.next() {
        update.status = status.parse().map_err(|_| ConsoleError::BadJson)?;
    }
    Ok(update)
}

pub fn parse_line(line: &str) -> Result<AppCommand, ConsoleError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(ConsoleError::Empty);
    }
    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    match verb {
        "connect" => Ok(AppCommand::ConnectionChanged(true)),
        "disconnect" => Ok(AppCommand::ConnectionChanged(false)),
        "target" if !rest.is_empty() => Ok(AppCommand::DesiredProperty {
            name: PROP_TARGET_TEMPERATURE.to_string(),
            value: json(rest)?,
        }),
        "panel" => Ok(AppCommand::DesiredProperty {
            name: PROP_PANEL_MESSAGE.to_string(),
            value: Value::String(rest.to_string()),
        }),
        "desired" => {
            let (name, value) = rest
                .split_once(char::is_whitespace)
                .ok_or(ConsoleError::MissingArgument)?;
            Ok(AppCommand::DesiredProperty {
                name: name.to_string(),
                value: json(value.trim())?,
            })
        }
        "method" if !rest.is_empty() => {
            let (name, payload) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            let payload = if payload.trim().is_empty() {
                Value::Null
            } else {
                json(payload.trim())?
            };
            Ok(AppCommand::DirectMethod {
                name: name.to_string(),
                payload,
            })
        }
        "update" if !rest.is_empty() => update(rest).map(AppCommand::UpdatePending),
        "target" | "method" | "update" => Err(ConsoleError::MissingArgument),
        _ => Err(ConsoleError::UnknownVerb),
    }
}
