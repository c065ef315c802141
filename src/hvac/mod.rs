//! HVAC decision logic: pure functions, zero I/O.
//!
//! | Module     | Decides                                        |
//! |------------|------------------------------------------------|
//! | `mode`     | Heating / Green / Cooling from current vs target |
//! | `target`   | whether a requested target temperature is accepted |
//! | `restart`  | whether a requested restart delay is accepted  |
//! | `panel`    | whether a panel message may be displayed       |
//! | `deferral` | how long to hold off an OS update              |

pub mod deferral;
pub mod mode;
pub mod panel;
pub mod restart;
pub mod target;
