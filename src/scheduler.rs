//! Timer/scheduler engine.
//!
//! All periodic work (sensor reads, telemetry publishing, twin updates)
//! and the one-shot timers (status LED blink phases, deferred restart)
//! live here.  The scheduler notifies a [`SchedulerDelegate`] when a timer
//! fires; the device implements the delegate by queueing an event that
//! the main loop dispatches through the timer registry.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Trigger Sources                          │
//! │                                                              │
//! │  ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌──────────┐   │
//! │  │ Read 4s   │  │ Publish 5s│  │ Twin 15s  │  │ One-Shot │   │
//! │  │ periodic  │  │ periodic  │  │ periodic  │  │ LED/Boot │   │
//! │  └─────┬─────┘  └─────┬─────┘  └─────┬─────┘  └─────┬────┘   │
//! │        ▼              ▼              ▼              ▼        │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │              SchedulerDelegate                         │  │
//! │  │       (device pushes into its EventQueue)              │  │
//! │  └───────────────────────┬────────────────────────────────┘  │
//! │                          ▼                                   │
//! │                 timer registry → handler                     │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use crate::app::ports::{OneShotTimer, ScheduleFiredKind, SchedulerDelegate};
use log::{debug, warn};

// ═══════════════════════════════════════════════════════════════
//  Timer identities
// ═══════════════════════════════════════════════════════════════

/// Every timer the device knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerId {
    ReadTelemetry,
    PublishTelemetry,
    UpdateDeviceTwins,
    StatusLedOn,
    StatusLedOff,
    Restart,
}

impl TimerId {
    /// Registry key for the timer's handler.
    pub const fn name(self) -> &'static str {
        match self {
            Self::ReadTelemetry => "ReadTelemetry",
            Self::PublishTelemetry => "PublishTelemetry",
            Self::UpdateDeviceTwins => "UpdateDeviceTwins",
            Self::StatusLedOn => "StatusLedOn",
            Self::StatusLedOff => "StatusLedOff",
            Self::Restart => "Restart",
        }
    }
}

/// The type of schedule determines how and when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleKind {
    /// Fire every `interval_ms`.
    Periodic { interval_ms: u32 },
    /// Fire once after `delay_ms`, then auto-disable.
    OneShot { delay_ms: u32 },
}

// ═══════════════════════════════════════════════════════════════
//  Scheduler engine
// ═══════════════════════════════════════════════════════════════

/// Maximum number of concurrent schedules (stack-allocated).
const MAX_SCHEDULES: usize = 8;

#[derive(Debug, Clone, Copy)]
struct ScheduleEntry {
    timer: TimerId,
    kind: ScheduleKind,
    elapsed_ms: u64,
    enabled: bool,
}

impl ScheduleEntry {
    fn new(timer: TimerId, kind: ScheduleKind) -> Self {
        Self {
            timer,
            kind,
            elapsed_ms: 0,
            enabled: true,
        }
    }
}

/// Tick-driven timer engine.  It never pushes events itself; firing is
/// reported to the [`SchedulerDelegate`] passed to [`Scheduler::tick`].
#[derive(Debug, Default)]
pub struct Scheduler {
    schedules: [Option<ScheduleEntry>; MAX_SCHEDULES],
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a periodic timer.  Returns the slot index, or `None` if full.
    pub fn add_periodic(&mut self, timer: TimerId, interval_ms: u32) -> Option<usize> {
        if interval_ms == 0 {
            warn!("Scheduler: refusing zero interval for '{}'", timer.name());
            return None;
        }
        self.install(ScheduleEntry::new(timer, ScheduleKind::Periodic { interval_ms }))
    }

    /// Whether `timer` is scheduled and will still fire.
    pub fn is_armed(&self, timer: TimerId) -> bool {
        self.slot_of(timer)
            .and_then(|slot| self.schedules[slot])
            .is_some_and(|e| e.enabled)
    }

    /// Advance every timer by `elapsed_ms`.  Call once per loop tick.
    ///
    /// A periodic timer fires at most once per tick and keeps its phase;
    /// a one-shot fires once and disables itself.
    pub fn tick(&mut self, elapsed_ms: u32, delegate: &mut dyn SchedulerDelegate) {
        for slot in self.schedules.iter_mut() {
            let entry = match slot {
                Some(e) if e.enabled => e,
                _ => continue,
            };

            entry.elapsed_ms += u64::from(elapsed_ms);

            match entry.kind {
                ScheduleKind::Periodic { interval_ms } => {
                    let interval = u64::from(interval_ms);
                    if entry.elapsed_ms >= interval {
                        debug!("Scheduler: '{}' periodic fire", entry.timer.name());
                        delegate.on_timer_fired(entry.timer, ScheduleFiredKind::Periodic);
                        // Drop whole missed periods rather than bursting.
                        entry.elapsed_ms %= interval;
                    }
                }
                ScheduleKind::OneShot { delay_ms } => {
                    if entry.elapsed_ms >= u64::from(delay_ms) {
                        debug!(
                            "Scheduler: '{}' one-shot fired (after {}ms)",
                            entry.timer.name(),
                            delay_ms
                        );
                        entry.enabled = false;
                        delegate.on_timer_fired(entry.timer, ScheduleFiredKind::OneShot);
                    }
                }
            }
        }
    }

    /// Number of active (enabled) schedules.
    pub fn active_count(&self) -> usize {
        self.schedules
            .iter()
            .filter(|s| s.is_some_and(|e| e.enabled))
            .count()
    }

    fn slot_of(&self, timer: TimerId) -> Option<usize> {
        self.schedules
            .iter()
            .position(|s| s.is_some_and(|e| e.timer == timer))
    }

    fn install(&mut self, entry: ScheduleEntry) -> Option<usize> {
        // Re-use the timer's own slot first so re-arming replaces it.
        let slot = self
            .slot_of(entry.timer)
            .or_else(|| self.schedules.iter().position(Option::is_none))
            .or_else(|| self.schedules.iter().position(|s| s.is_some_and(|e| !e.enabled)));

        match slot {
            Some(i) => {
                self.schedules[i] = Some(entry);
                Some(i)
            }
            None => {
                warn!("Scheduler: no free slot for '{}'", entry.timer.name());
                None
            }
        }
    }
}

impl OneShotTimer for Scheduler {
    fn arm_one_shot(&mut self, timer: TimerId, delay_ms: u32) {
        self.install(ScheduleEntry::new(timer, ScheduleKind::OneShot { delay_ms }));
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
