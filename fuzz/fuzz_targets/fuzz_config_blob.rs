//! Fuzz target: stored configuration blob
//!
//! Plants arbitrary bytes in the host NVS simulation and loads them back.
//! A blob that decodes must also pass validation; anything else must come
//! back as an error rather than a panic.
//!
//! cargo fuzz run fuzz_config_blob

#![no_main]

use hvacmon::adapters::nvs::NvsAdapter;
use hvacmon::app::ports::ConfigPort;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(nvs) = NvsAdapter::new() else {
        return;
    };
    nvs.sim_store_raw(data);

    if let Ok(config) = nvs.load() {
        assert!(config.validate().is_ok(), "loaded config must be valid");
        assert!(config.loop_tick_ms > 0);
    }
});
