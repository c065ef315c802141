//! HVAC operating mode.
//!
//! ```text
//!              ┌──────────── current < target ───────────┐
//!              ▼                                          │
//!  UNKNOWN ──▶ HEATING ◀──▶ GREEN ◀──▶ COOLING ◀──────────┘
//!   (initial)         current == target   current > target
//! ```
//!
//! Unknown is left on the first decision and never re-entered.  There is
//! no hysteresis: a one-degree step across the target flips the mode.

use core::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Mode {
    #[default]
    Unknown = 0,
    Heating = 1,
    Green = 2,
    Cooling = 3,
}

impl Mode {
    /// Device twin string for this mode.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Heating => "Heating",
            Self::Green => "Green",
            Self::Cooling => "Cooling",
        }
    }

    /// Whether a decision has been made.
    pub const fn is_known(self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pure mode decision.
pub fn decide_mode(current: i32, target: i32) -> Mode {
    use core::cmp::Ordering;

    match current.cmp(&target) {
        Ordering::Equal => Mode::Green,
        Ordering::Greater => Mode::Cooling,
        Ordering::Less => Mode::Heating,
    }
}
