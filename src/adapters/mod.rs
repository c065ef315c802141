//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements     | Connects to                 |
//! |------------|----------------|-----------------------------|
//! | `hardware` | SensorPort     | simulated environment sensor|
//! |            | IndicatorPort  | LED GPIOs                   |
//! |            | SystemPort     | wall clock, heap, restart   |
//! | `cloud`    | CloudPort      | log output                  |
//! | `log_sink` | EventSink      | serial log output           |
//! | `nvs`      | ConfigPort     | NVS / in-memory store       |
//! | `console`  |                | stdin → AppCommand (host)   |

pub mod cloud;
pub mod console;
pub mod hardware;
pub mod log_sink;
pub mod nvs;
