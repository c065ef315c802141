//! Operating mode indicator: three discrete LEDs (red / green / blue).
//!
//! Exactly one colour is lit for a known mode; `Unknown` leaves all three
//! dark.  Switching extinguishes the previous colour before lighting the
//! new one.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the GPIOs via hw_init.
//! On host/test: tracks state in-memory only.

use crate::drivers::hw_init;
use crate::hvac::mode::Mode;
use crate::pins;

pub struct ModeLeds {
    lit: Mode,
}

impl Default for ModeLeds {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeLeds {
    pub fn new() -> Self {
        Self { lit: Mode::Unknown }
    }

    /// GPIO for a mode's colour.  `None` for `Unknown`.
    pub const fn pin_for(mode: Mode) -> Option<i32> {
        match mode {
            Mode::Heating => Some(pins::MODE_LED_RED_GPIO),
            Mode::Green => Some(pins::MODE_LED_GREEN_GPIO),
            Mode::Cooling => Some(pins::MODE_LED_BLUE_GPIO),
            Mode::Unknown => None,
        }
    }

    pub fn show(&mut self, mode: Mode) {
        if mode == self.lit {
            return;
        }
        if let Some(pin) = Self::pin_for(self.lit) {
            hw_init::led_write(pin, false);
        }
        if let Some(pin) = Self::pin_for(mode) {
            hw_init::led_write(pin, true);
        }
        self.lit = mode;
    }

    pub fn lit(&self) -> Mode {
        self.lit
    }
}
