//! LED drivers and hardware initialisation.

pub mod hw_init;
pub mod mode_leds;
pub mod status_led;
