//! Fuzz target: `console::parse_line`
//!
//! Feeds arbitrary UTF-8 lines to the host console parser and checks that
//! it never panics and that blank input is always reported as `Empty`.
//!
//! cargo fuzz run fuzz_console_line

#![no_main]

use hvacmon::adapters::console::{parse_line, ConsoleError};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(line) = core::str::from_utf8(data) else {
        return;
    };

    let parsed = parse_line(line);
    if line.trim().is_empty() {
        assert_eq!(parsed, Err(ConsoleError::Empty));
    }
});
