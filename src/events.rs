//! Device event queue.
//!
//! Events are produced by:
//! - the scheduler (periodic and one-shot timers)
//! - the cloud connection status callback
//!
//! and consumed by the device loop, which drains them in FIFO order and
//! routes each to its registered handler.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Scheduler   │────▶│  EventQueue  │────▶│  Device loop │
//! │ Connection  │────▶│  (bounded)   │     │  (consumer)  │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```

use heapless::Deque;
use log::warn;

use crate::app::ports::{ScheduleFiredKind, SchedulerDelegate};
use crate::scheduler::TimerId;

/// Maximum number of pending events.
pub const EVENT_QUEUE_CAP: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A scheduler timer expired.
    TimerFired(TimerId),
    /// Cloud connection came up (`true`) or went down.
    ConnectionChanged(bool),
}

#[derive(Debug, Default)]
pub struct EventQueue {
    pending: Deque<Event, EVENT_QUEUE_CAP>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an event.  Returns `false` if the queue is full (event dropped).
    pub fn push(&mut self, event: Event) -> bool {
        match self.pending.push_back(event) {
            Ok(()) => true,
            Err(event) => {
                warn!("Event queue full, dropped {:?}", event);
                false
            }
        }
    }

    pub fn pop(&mut self) -> Option<Event> {
        self.pending.pop_front()
    }
}

impl SchedulerDelegate for EventQueue {
    fn on_timer_fired(&mut self, timer: TimerId, _kind: ScheduleFiredKind) {
        self.push(Event::TimerFired(timer));
    }
}
