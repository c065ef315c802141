//! Handler bindings: what each timer, desired property and direct method
//! does.  [`bind_all`] installs them in the device registries.

use log::{info, warn};
use serde_json::Value;

use crate::app::ports::OneShotTimer;
use crate::error::{CommsError, Error, Rejection};
use crate::hvac::restart::{delay_from_payload, response_message};
use crate::scheduler::TimerId;

use super::device::{Device, MethodResponse, MethodStatus};
use super::events::AppEvent;
use super::ports::{CloudPort, EventSink, IndicatorPort, SensorPort, SystemPort};
use super::service::{PROP_PANEL_MESSAGE, PROP_TARGET_TEMPERATURE};

pub const METHOD_RESTART: &str = "HvacRestart";
pub const METHOD_ON: &str = "HvacOn";
pub const METHOD_OFF: &str = "HvacOff";

pub(super) fn bind_all<H, C, S>(device: &mut Device<H, C, S>) -> Result<(), Error>
where
    H: SensorPort + IndicatorPort + SystemPort,
    C: CloudPort,
    S: EventSink,
{
    device.bind_timer(TimerId::ReadTelemetry, read_telemetry)?;
    device.bind_timer(TimerId::PublishTelemetry, publish_telemetry)?;
    device.bind_timer(TimerId::UpdateDeviceTwins, update_device_twins)?;
    device.bind_timer(TimerId::StatusLedOn, status_led_on)?;
    device.bind_timer(TimerId::StatusLedOff, status_led_off)?;
    device.bind_timer(TimerId::Restart, restart_due)?;

    device.bind_property(PROP_TARGET_TEMPERATURE, target_temperature)?;
    device.bind_property(PROP_PANEL_MESSAGE, panel_message)?;

    device.bind_method(METHOD_RESTART, hvac_restart)?;
    device.bind_method(METHOD_ON, hvac_on)?;
    device.bind_method(METHOD_OFF, hvac_off)?;
    Ok(())
}

// ── Timers ────────────────────────────────────────────────────

fn read_telemetry<H, C, S>(d: &mut Device<H, C, S>)
where
    H: SensorPort + IndicatorPort + SystemPort,
    C: CloudPort,
    S: EventSink,
{
    // Read failures are logged by the service; the next tick retries.
    let _ = d.app.acquire(&mut d.hw, &mut d.sink);
}

fn publish_telemetry<H, C, S>(d: &mut Device<H, C, S>)
where
    H: SensorPort + IndicatorPort + SystemPort,
    C: CloudPort,
    S: EventSink,
{
    let memory = d.hw.memory_usage();
    match d.app.publish_telemetry(&mut d.cloud, memory, &mut d.sink) {
        Ok(_) => {}
        Err(CommsError::MessageTooLarge) => d.raise_fatal(CommsError::MessageTooLarge),
        Err(e) => warn!("Telemetry publish failed: {}", e),
    }
}

fn update_device_twins<H, C, S>(d: &mut Device<H, C, S>)
where
    H: SensorPort + IndicatorPort + SystemPort,
    C: CloudPort,
    S: EventSink,
{
    d.app.on_periodic_report_tick(&mut d.cloud, &mut d.sink);
}

fn status_led_on<H, C, S>(d: &mut Device<H, C, S>)
where
    H: SensorPort + IndicatorPort + SystemPort,
    C: CloudPort,
    S: EventSink,
{
    let blink = d.blink.next_blink();
    d.hw.set_network_led(true);
    d.scheduler.arm_one_shot(TimerId::StatusLedOff, blink.on_ms);
    d.scheduler.arm_one_shot(TimerId::StatusLedOn, blink.period_ms);
}

fn status_led_off<H, C, S>(d: &mut Device<H, C, S>)
where
    H: SensorPort + IndicatorPort + SystemPort,
    C: CloudPort,
    S: EventSink,
{
    d.hw.set_network_led(false);
}

fn restart_due<H, C, S>(d: &mut Device<H, C, S>)
where
    H: SensorPort + IndicatorPort + SystemPort,
    C: CloudPort,
    S: EventSink,
{
    d.app.on_restart_due(&mut d.sink);
    d.hw.reboot();
}

// ── Desired properties ────────────────────────────────────────

fn target_temperature<H, C, S>(d: &mut Device<H, C, S>, value: &Value)
where
    H: SensorPort + IndicatorPort + SystemPort,
    C: CloudPort,
    S: EventSink,
{
    let Some(requested) = value.as_i64() else {
        warn!("{}: expected an integer, got {}", PROP_TARGET_TEMPERATURE, value);
        d.sink.emit(&AppEvent::Rejected(Rejection::InvalidPayload));
        return;
    };
    let requested = requested.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
    let _ = d
        .app
        .on_target_temperature_requested(requested, &mut d.cloud, &mut d.hw, &mut d.sink);
}

fn panel_message<H, C, S>(d: &mut Device<H, C, S>, value: &Value)
where
    H: SensorPort + IndicatorPort + SystemPort,
    C: CloudPort,
    S: EventSink,
{
    let Some(text) = value.as_str() else {
        warn!("{}: expected a string, got {}", PROP_PANEL_MESSAGE, value);
        d.sink.emit(&AppEvent::Rejected(Rejection::InvalidPayload));
        return;
    };
    let _ = d.app.on_panel_message_requested(text, &mut d.cloud, &mut d.sink);
}

// ── Direct methods ────────────────────────────────────────────

fn hvac_restart<H, C, S>(d: &mut Device<H, C, S>, method: &str, payload: &Value) -> MethodResponse
where
    H: SensorPort + IndicatorPort + SystemPort,
    C: CloudPort,
    S: EventSink,
{
    let outcome = delay_from_payload(payload)
        .and_then(|seconds| d.app.on_restart_requested(seconds, &mut d.scheduler, &mut d.sink));
    let status = if outcome.is_ok() {
        MethodStatus::Succeeded
    } else {
        MethodStatus::Failed
    };
    MethodResponse::new(status, &response_message(method, outcome))
}

fn hvac_on<H, C, S>(d: &mut Device<H, C, S>, method: &str, _payload: &Value) -> MethodResponse
where
    H: SensorPort + IndicatorPort + SystemPort,
    C: CloudPort,
    S: EventSink,
{
    info!("HVAC operating LED on");
    d.app.set_operating(true, &mut d.hw, &mut d.sink);
    MethodResponse::called(method)
}

fn hvac_off<H, C, S>(d: &mut Device<H, C, S>, method: &str, _payload: &Value) -> MethodResponse
where
    H: SensorPort + IndicatorPort + SystemPort,
    C: CloudPort,
    S: EventSink,
{
    info!("HVAC operating LED off");
    d.app.set_operating(false, &mut d.hw, &mut d.sink);
    MethodResponse::called(method)
}
