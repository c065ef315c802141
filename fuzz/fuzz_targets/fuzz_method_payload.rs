//! Fuzz target: restart payload and panel message acceptors
//!
//! Arbitrary bytes are parsed as a JSON method payload and pushed through
//! the restart delay guard and response builder.  The same bytes, taken as
//! text, go through the panel message acceptor.
//!
//! Invariants checked:
//! - No panics under any payload
//! - An accepted delay is always within 3..=10 seconds
//! - An accepted panel message is printable ASCII shorter than the buffer
//!
//! cargo fuzz run fuzz_method_payload

#![no_main]

use hvacmon::hvac::panel::{accept_panel_message, PANEL_CAPACITY};
use hvacmon::hvac::restart::{delay_from_payload, response_message, validate_restart_delay};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(payload) = serde_json::from_slice::<serde_json::Value>(data) {
        let outcome = delay_from_payload(&payload).and_then(validate_restart_delay);
        if let Ok(delay) = outcome {
            assert!((3..=10).contains(&delay.secs()));
        }
        let msg = response_message("HvacRestart", outcome);
        if payload.is_number() {
            assert!(msg.starts_with("HvacRestart called"));
        } else {
            assert!(msg.is_empty());
        }
    }

    if let Ok(text) = core::str::from_utf8(data) {
        if let Ok(message) = accept_panel_message(text) {
            assert!(message.len() < PANEL_CAPACITY);
            assert!(message.bytes().all(|b| (0x20..=0x7e).contains(&b)));
        }
    }
});
