//! Device runtime: the scheduler, event queue and handler registries
//! wrapped around the [`AppService`].
//!
//! ```text
//!  Scheduler ──tick──▶ EventQueue ──drain──▶ timer registry ──▶ handler
//!  AppCommand ─────────────────────────────▶ property / method registry
//! ```
//!
//! Every handler is a plain `fn` bound by name at construction.  The
//! device owns its adapters, so handlers receive `&mut Device` and reach
//! the service and ports through it.

use core::fmt::Write as _;

use log::{info, warn};
use serde_json::Value;

use crate::dispatch::Registry;
use crate::drivers::status_led::BlinkPattern;
use crate::error::{CommsError, Error};
use crate::events::{Event, EventQueue};
use crate::hvac::restart::RESPONSE_CAPACITY;
use crate::scheduler::{Scheduler, TimerId};

use super::bindings;
use super::commands::AppCommand;
use super::ports::{CloudPort, EventSink, IndicatorPort, SensorPort, SystemPort};
use super::service::AppService;

// ── Method responses ──────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodStatus {
    Succeeded,
    Failed,
    NotFound,
}

impl MethodStatus {
    /// HTTP-style status code returned to the caller.
    pub const fn code(self) -> u16 {
        match self {
            Self::Succeeded => 200,
            Self::Failed => 500,
            Self::NotFound => 404,
        }
    }
}

/// Reply to a direct method invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodResponse {
    pub status: MethodStatus,
    pub message: heapless::String<RESPONSE_CAPACITY>,
}

impl MethodResponse {
    pub fn new(status: MethodStatus, message: &str) -> Self {
        let mut text = heapless::String::new();
        // Over-long messages are truncated at a char boundary.
        for c in message.chars() {
            if text.push(c).is_err() {
                break;
            }
        }
        Self { status, message: text }
    }

    /// `"<method> called"`, the plain acknowledgement of a method that
    /// takes no arguments.
    pub fn called(method: &str) -> Self {
        let mut text = heapless::String::<RESPONSE_CAPACITY>::new();
        let _ = write!(text, "{method} called");
        Self::new(MethodStatus::Succeeded, &text)
    }

    /// JSON body sent back to the hub (`"\"<message>\""`).
    pub fn body(&self) -> String {
        Value::String(self.message.as_str().to_owned()).to_string()
    }
}

// ── Handler signatures ────────────────────────────────────────

pub type TimerHandler<H, C, S> = fn(&mut Device<H, C, S>);
pub type PropertyHandler<H, C, S> = fn(&mut Device<H, C, S>, &Value);
pub type MethodHandler<H, C, S> = fn(&mut Device<H, C, S>, &str, &Value) -> MethodResponse;

const MAX_TIMERS: usize = 8;
const MAX_PROPERTIES: usize = 4;
const MAX_METHODS: usize = 4;

// ───────────────────────────────────────────────────────────────
// Device
// ───────────────────────────────────────────────────────────────

pub struct Device<H, C, S> {
    pub(super) app: AppService,
    pub(super) scheduler: Scheduler,
    queue: EventQueue,
    pub(super) hw: H,
    pub(super) cloud: C,
    pub(super) sink: S,
    pub(super) blink: BlinkPattern,
    timers: Registry<TimerHandler<H, C, S>, MAX_TIMERS>,
    properties: Registry<PropertyHandler<H, C, S>, MAX_PROPERTIES>,
    methods: Registry<MethodHandler<H, C, S>, MAX_METHODS>,
    /// First unrecoverable error raised by a handler.
    pub(super) fatal: Option<Error>,
}

impl<H, C, S> Device<H, C, S>
where
    H: SensorPort + IndicatorPort + SystemPort,
    C: CloudPort,
    S: EventSink,
{
    /// Build the device and bind every timer, property and method handler.
    pub fn new(app: AppService, hw: H, cloud: C, sink: S) -> Result<Self, Error> {
        let mut device = Self {
            app,
            scheduler: Scheduler::new(),
            queue: EventQueue::new(),
            hw,
            cloud,
            sink,
            blink: BlinkPattern::new(),
            timers: Registry::new(),
            properties: Registry::new(),
            methods: Registry::new(),
            fatal: None,
        };
        bindings::bind_all(&mut device)?;
        Ok(device)
    }

    pub fn bind_timer(&mut self, timer: TimerId, handler: TimerHandler<H, C, S>) -> Result<(), Error> {
        Ok(self.timers.bind(timer.name(), handler)?)
    }

    pub fn bind_property(
        &mut self,
        name: &'static str,
        handler: PropertyHandler<H, C, S>,
    ) -> Result<(), Error> {
        Ok(self.properties.bind(name, handler)?)
    }

    pub fn bind_method(&mut self, name: &'static str, handler: MethodHandler<H, C, S>) -> Result<(), Error> {
        Ok(self.methods.bind(name, handler)?)
    }

    /// Start the service, the periodic timers and the network LED.
    pub fn start(&mut self) -> Result<(), Error> {
        self.app.start(&mut self.sink);

        let cfg = self.app.config();
        let periodic = [
            (TimerId::ReadTelemetry, cfg.read_interval_ms),
            (TimerId::PublishTelemetry, cfg.publish_interval_ms),
            (TimerId::UpdateDeviceTwins, cfg.twin_update_interval_ms),
        ];
        for (timer, interval_ms) in periodic {
            if self.scheduler.add_periodic(timer, interval_ms).is_none() {
                return Err(Error::Config("no scheduler slot for periodic timer"));
            }
        }

        // First blink starts straight away.
        self.dispatch_timer(TimerId::StatusLedOn);
        info!("Device started: {} timers scheduled", self.scheduler.active_count());
        Ok(())
    }

    /// Advance time by `elapsed_ms`, then run every handler that came due.
    /// Returns the first fatal error raised by a handler.
    pub fn tick(&mut self, elapsed_ms: u32) -> Result<(), Error> {
        self.scheduler.tick(elapsed_ms, &mut self.queue);
        self.drain()
    }

    /// Queue an event for the next drain.
    pub fn post(&mut self, event: Event) -> bool {
        self.queue.push(event)
    }

    /// Route an inbound command.  Direct methods always get a response.
    pub fn handle_command(&mut self, command: AppCommand) -> Option<MethodResponse> {
        match command {
            AppCommand::DesiredProperty { name, value } => {
                match self.properties.lookup(&name) {
                    Some(handler) => handler(self, &value),
                    None => info!("Desired property '{}' ignored: no handler", name),
                }
                None
            }
            AppCommand::DirectMethod { name, payload } => {
                let response = match self.methods.lookup(&name) {
                    Some(handler) => handler(self, &name, &payload),
                    None => {
                        warn!("Direct method '{}' not found", name);
                        MethodResponse::new(MethodStatus::NotFound, "Method not found")
                    }
                };
                info!("Method {} -> {} {}", name, response.status.code(), response.body());
                Some(response)
            }
            AppCommand::ConnectionChanged(connected) => {
                self.post(Event::ConnectionChanged(connected));
                None
            }
            AppCommand::UpdatePending(update) => {
                let hour = self.hw.utc_hour();
                let utc = self.hw.utc_now();
                self.app
                    .on_update_pending(hour, &utc, update, &mut self.cloud, &mut self.sink);
                None
            }
        }
    }

    fn drain(&mut self) -> Result<(), Error> {
        while let Some(event) = self.queue.pop() {
            match event {
                Event::TimerFired(timer) => self.dispatch_timer(timer),
                Event::ConnectionChanged(connected) => self.on_connection_changed(connected),
            }
        }
        match self.fatal {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn dispatch_timer(&mut self, timer: TimerId) {
        match self.timers.lookup(timer.name()) {
            Some(handler) => handler(self),
            None => warn!("Timer '{}' fired with no handler", timer.name()),
        }
    }

    fn on_connection_changed(&mut self, connected: bool) {
        self.blink.set_connected(connected);
        let utc = self.hw.utc_now();
        self.app
            .on_connection_changed(connected, &utc, &mut self.cloud, &mut self.sink);
    }

    pub(super) fn raise_fatal(&mut self, error: CommsError) {
        warn!("Fatal: {}", error);
        if self.fatal.is_none() {
            self.fatal = Some(Error::Comms(error));
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn app(&self) -> &AppService {
        &self.app
    }

    pub fn hw(&self) -> &H {
        &self.hw
    }

    pub fn hw_mut(&mut self) -> &mut H {
        &mut self.hw
    }

    pub fn cloud(&self) -> &C {
        &self.cloud
    }

    pub fn cloud_mut(&mut self) -> &mut C {
        &mut self.cloud
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn method_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.methods.names()
    }

    pub fn property_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.properties.names()
    }
}
