//! Restart scheduling guard.
//!
//! A restart is never performed inline: the accepted delay arms a one-shot
//! timer so the current cycle completes and pending twin reports flush
//! before the reboot.

use core::fmt::Write as _;

use crate::config::Bounds;
use crate::error::Rejection;

/// Default accepted delay range (seconds, inclusive).
pub const RESTART_DELAY_BOUNDS: Bounds = Bounds::new(3, 10);

/// Capacity of a direct method response message.
pub const RESPONSE_CAPACITY: usize = 100;

/// A restart delay that passed the range check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestartDelay(u32);

impl RestartDelay {
    pub fn secs(self) -> u32 {
        self.0
    }

    /// Delay in milliseconds, saturating at `u32::MAX`.
    pub fn millis(self) -> u32 {
        self.0.saturating_mul(1_000)
    }
}

pub fn validate_restart_delay_within(
    seconds: i32,
    bounds: Bounds,
) -> Result<RestartDelay, Rejection> {
    if bounds.contains(seconds) && seconds > 0 {
        Ok(RestartDelay(seconds as u32))
    } else {
        Err(Rejection::OutOfRangeRestartDelay(seconds))
    }
}

pub fn validate_restart_delay(seconds: i32) -> Result<RestartDelay, Rejection> {
    validate_restart_delay_within(seconds, RESTART_DELAY_BOUNDS)
}

/// Extract the delay from a direct method payload.  The payload must be a
/// JSON number; fractional values are truncated.
pub fn delay_from_payload(payload: &serde_json::Value) -> Result<i32, Rejection> {
    if let Some(n) = payload.as_i64() {
        return Ok(n.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32);
    }
    payload
        .as_f64()
        .map(|f| f as i32)
        .ok_or(Rejection::InvalidPayload)
}

/// Method response text for the outcome of a restart request.
pub fn response_message(
    method: &str,
    outcome: Result<RestartDelay, Rejection>,
) -> heapless::String<RESPONSE_CAPACITY> {
    let mut msg = heapless::String::new();
    // Truncation on overflow is acceptable for a human-readable response.
    let _ = match outcome {
        Ok(delay) => write!(msg, "{method} called. Restart in {} seconds", delay.secs()),
        Err(Rejection::OutOfRangeRestartDelay(seconds)) => write!(
            msg,
            "{method} called. Restart Failed. Seconds out of range: {seconds}"
        ),
        // A payload that is not a number gets an empty reply.
        Err(_) => Ok(()),
    };
    msg
}
