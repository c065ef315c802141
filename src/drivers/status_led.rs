//! Single-colour status LEDs and the network blink pattern.
//!
//! On ESP-IDF: drives the GPIO via hw_init.
//! On host/test: tracks state in-memory only.

use crate::drivers::hw_init;

pub struct StatusLed {
    pin: i32,
    lit: bool,
}

impl StatusLed {
    pub fn new(pin: i32) -> Self {
        Self { pin, lit: false }
    }

    pub fn set(&mut self, lit: bool) {
        hw_init::led_write(self.pin, lit);
        self.lit = lit;
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }
}

// ── Blink pattern ─────────────────────────────────────────────

/// One blink: on for `on_ms` out of every `period_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blink {
    pub on_ms: u32,
    pub period_ms: u32,
}

/// Start-up flashes before the connection state takes over.
pub const INIT_FLASHES: u8 = 25;

pub const INIT_BLINK: Blink = Blink { on_ms: 100, period_ms: 200 };
/// Long on, short off.
pub const CONNECTED_BLINK: Blink = Blink { on_ms: 1_300, period_ms: 1_400 };
/// Half on, half off.
pub const DISCONNECTED_BLINK: Blink = Blink { on_ms: 700, period_ms: 1_400 };

/// Network LED pattern: a burst of quick flashes at boot, then a slow
/// blink whose duty cycle shows whether the cloud is connected.
#[derive(Debug, Clone)]
pub struct BlinkPattern {
    init_remaining: u8,
    connected: bool,
}

impl Default for BlinkPattern {
    fn default() -> Self {
        Self::new()
    }
}

impl BlinkPattern {
    pub fn new() -> Self {
        Self {
            init_remaining: INIT_FLASHES,
            connected: false,
        }
    }

    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    /// Timing for the next blink.  Call on every rising edge.
    pub fn next_blink(&mut self) -> Blink {
        if self.init_remaining > 0 {
            self.init_remaining -= 1;
            INIT_BLINK
        } else if self.connected {
            CONNECTED_BLINK
        } else {
            DISCONNECTED_BLINK
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_burst_then_disconnected() {
        let mut pattern = BlinkPattern::new();
        for _ in 0..INIT_FLASHES {
            assert_eq!(pattern.next_blink(), INIT_BLINK);
        }
        assert_eq!(pattern.next_blink(), DISCONNECTED_BLINK);
    }

    #[test]
    fn connection_changes_duty() {
        let mut pattern = BlinkPattern::new();
        for _ in 0..INIT_FLASHES {
            pattern.next_blink();
        }
        pattern.set_connected(true);
        assert_eq!(pattern.next_blink(), CONNECTED_BLINK);
        pattern.set_connected(false);
        assert_eq!(pattern.next_blink(), DISCONNECTED_BLINK);
    }

    #[test]
    fn connection_during_init_waits_for_burst() {
        let mut pattern = BlinkPattern::new();
        pattern.set_connected(true);
        assert_eq!(pattern.next_blink(), INIT_BLINK);
    }

    #[test]
    fn led_tracks_state() {
        let mut led = StatusLed::new(crate::pins::NETWORK_LED_GPIO);
        assert!(!led.is_lit());
        led.set(true);
        assert!(led.is_lit());
    }
}
