//! GPIO pin assignments for the HVAC lab board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Operating mode indicator (discrete RGB LED)
// ---------------------------------------------------------------------------

/// Lit while the HVAC is heating.
pub const MODE_LED_RED_GPIO: i32 = 4;
/// Lit while the HVAC is in the green (idle) band.
pub const MODE_LED_GREEN_GPIO: i32 = 5;
/// Lit while the HVAC is cooling.
pub const MODE_LED_BLUE_GPIO: i32 = 6;

// ---------------------------------------------------------------------------
// Status LEDs
// ---------------------------------------------------------------------------

/// Network connection status (blinks, see `drivers::status_led`).
pub const NETWORK_LED_GPIO: i32 = 7;
/// HVAC operating LED, switched by the `HvacOn` / `HvacOff` methods.
pub const OPERATING_LED_GPIO: i32 = 15;

/// Board LEDs sink current: driving the pin LOW lights the LED.
pub const LED_ACTIVE_LOW: bool = true;

/// All LED outputs, in init order.
pub const LED_OUTPUTS: [i32; 5] = [
    MODE_LED_RED_GPIO,
    MODE_LED_GREEN_GPIO,
    MODE_LED_BLUE_GPIO,
    NETWORK_LED_GPIO,
    OPERATING_LED_GPIO,
];
