//! Target temperature acceptor.

use crate::config::Bounds;
use crate::error::Rejection;

/// Default accepted range (°C).
pub const TARGET_BOUNDS: Bounds = Bounds::new(0, 50);

/// A target temperature that passed the range check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetTemperature(i32);

impl TargetTemperature {
    pub fn celsius(self) -> i32 {
        self.0
    }
}

/// Accept `value` iff it lies within `bounds`.
pub fn accept_target_within(value: i32, bounds: Bounds) -> Result<TargetTemperature, Rejection> {
    if bounds.contains(value) {
        Ok(TargetTemperature(value))
    } else {
        Err(Rejection::OutOfRangeTarget(value))
    }
}

/// Accept `value` against the default range.
pub fn accept_target(value: i32) -> Result<TargetTemperature, Rejection> {
    accept_target_within(value, TARGET_BOUNDS)
}
