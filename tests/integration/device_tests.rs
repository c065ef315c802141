//! Integration tests for the Device runtime: scheduler → event queue →
//! registry → handler → AppService → mock ports.

use serde_json::{json, Value};

use hvacmon::app::commands::AppCommand;
use hvacmon::app::device::{Device, MethodResponse, MethodStatus};
use hvacmon::app::events::AppEvent;
use hvacmon::app::ports::AckStatus;
use hvacmon::app::service::AppService;
use hvacmon::config::HvacConfig;
use hvacmon::error::{Error, RegistryError};
use hvacmon::hvac::deferral::{PendingUpdate, UpdateKind, UpdateStatus};
use hvacmon::hvac::mode::Mode;
use hvacmon::scheduler::TimerId;
use hvacmon::telemetry::reading::Reading;

use crate::mock_hw::{MockCloud, MockHardware, Owned, RecordingSink};

type TestDevice = Device<MockHardware, MockCloud, RecordingSink>;

fn make_device(hw: MockHardware) -> TestDevice {
    let app = AppService::new(HvacConfig::default());
    let mut device = Device::new(app, hw, MockCloud::new(), RecordingSink::new()).unwrap();
    device.start().unwrap();
    device
}

/// Advance in 100 ms loop ticks.
fn run_for(device: &mut TestDevice, ms: u32) {
    for _ in 0..ms / 100 {
        device.tick(100).unwrap();
    }
}

fn method(name: &str, payload: Value) -> AppCommand {
    AppCommand::DirectMethod {
        name: name.to_string(),
        payload,
    }
}

fn desired(name: &str, value: Value) -> AppCommand {
    AppCommand::DesiredProperty {
        name: name.to_string(),
        value,
    }
}

fn connect(device: &mut TestDevice) {
    assert!(device.handle_command(AppCommand::ConnectionChanged(true)).is_none());
    device.tick(0).unwrap();
}

// ── Periodic cycle ────────────────────────────────────────────

#[test]
fn fifteen_seconds_of_operation() {
    let hw = MockHardware::with_readings(&[Reading::new(22, 1000, 40); 4]);
    let mut device = make_device(hw);
    connect(&mut device);
    device.handle_command(desired("TargetTemperature", json!(22)));

    run_for(&mut device, 15_000);

    // Reads at 4, 8, 12 s; publishes at 5, 10, 15 s; one twin update at 15 s.
    let ids: Vec<u32> = device.cloud().published.iter().map(|m| m.msg_id).collect();
    assert_eq!(ids, vec![0, 1, 2]);
    assert_eq!(device.cloud().published[0].temperature, 22);

    assert_eq!(
        device.cloud().reported_names(),
        vec![
            "HvacSoftwareVersion",
            "HvacStartUtc",
            "Temperature",
            "Pressure",
            "Humidity",
            "HvacOperatingMode",
        ]
    );
    assert_eq!(
        device.cloud().reports.last(),
        Some(&("HvacOperatingMode".to_string(), Owned::Text("Green".into())))
    );
    assert_eq!(device.hw().modes_shown(), vec![Mode::Green]);
}

#[test]
fn nothing_leaves_the_device_while_offline() {
    let hw = MockHardware::with_readings(&[Reading::new(22, 1000, 40); 4]);
    let mut device = make_device(hw);

    run_for(&mut device, 15_000);

    assert!(device.cloud().published.is_empty());
    assert!(device.cloud().reports.is_empty());
    assert!(device.app().telemetry().valid);
}

#[test]
fn out_of_range_reading_suppresses_publish_and_reports() {
    let hw = MockHardware::with_readings(&[Reading::new(80, 1000, 40); 4]);
    let mut device = make_device(hw);
    connect(&mut device);
    device.cloud_mut().clear();

    run_for(&mut device, 15_000);

    assert!(device.cloud().published.is_empty());
    assert!(device.cloud().reports.is_empty());
    let invalid = device
        .sink()
        .events
        .iter()
        .filter(|e| matches!(e, AppEvent::ReadingAcquired { valid: false, .. }))
        .count();
    assert_eq!(invalid, 3);
}

#[test]
fn first_connection_reported_once() {
    let mut device = make_device(MockHardware::new());
    connect(&mut device);
    device.handle_command(AppCommand::ConnectionChanged(false));
    device.tick(0).unwrap();
    connect(&mut device);

    let version_reports = device
        .cloud()
        .reports
        .iter()
        .filter(|(name, _)| name == "HvacSoftwareVersion")
        .count();
    assert_eq!(version_reports, 1);
    assert_eq!(
        device.cloud().reports[1],
        ("HvacStartUtc".to_string(), Owned::Text("2026-03-01T00:00:00Z".into()))
    );
}

// ── Desired properties ────────────────────────────────────────

#[test]
fn target_property_acknowledged() {
    let mut device = make_device(MockHardware::new());
    device.handle_command(desired("TargetTemperature", json!(21)));
    device.handle_command(desired("TargetTemperature", json!(99)));

    assert_eq!(
        device.cloud().acks,
        vec![
            ("TargetTemperature".to_string(), Owned::Int(21), AckStatus::Completed),
            ("TargetTemperature".to_string(), Owned::Int(99), AckStatus::Error),
        ]
    );
    assert_eq!(device.app().target().map(|t| t.celsius()), Some(21));
}

#[test]
fn non_numeric_target_is_ignored() {
    let mut device = make_device(MockHardware::new());
    device.handle_command(desired("TargetTemperature", json!("warm")));
    assert!(device.cloud().acks.is_empty());
    assert!(device.app().target().is_none());
}

#[test]
fn panel_message_property() {
    let mut device = make_device(MockHardware::new());
    device.handle_command(desired("PanelMessage", json!("Filter change due")));
    device.handle_command(desired("PanelMessage", json!("x".repeat(64))));

    assert_eq!(device.app().panel_message(), "Filter change due");
    let statuses: Vec<AckStatus> = device.cloud().acks.iter().map(|(_, _, s)| *s).collect();
    assert_eq!(statuses, vec![AckStatus::Completed, AckStatus::Error]);
}

#[test]
fn unknown_property_is_ignored() {
    let mut device = make_device(MockHardware::new());
    assert!(device.handle_command(desired("FanSpeed", json!(3))).is_none());
    assert!(device.cloud().acks.is_empty());
}

// ── Direct methods ────────────────────────────────────────────

#[test]
fn restart_is_deferred_by_requested_delay() {
    let mut device = make_device(MockHardware::new());
    let response = device.handle_command(method("HvacRestart", json!(3))).unwrap();
    assert_eq!(response.status, MethodStatus::Succeeded);
    assert_eq!(response.message.as_str(), "HvacRestart called. Restart in 3 seconds");
    assert!(device.scheduler().is_armed(TimerId::Restart));

    run_for(&mut device, 2_900);
    assert_eq!(device.hw().reboots, 0);

    run_for(&mut device, 100);
    assert_eq!(device.hw().reboots, 1);
    assert!(device.sink().events.contains(&AppEvent::Restarting));
}

#[test]
fn restart_out_of_range_fails_without_arming() {
    let mut device = make_device(MockHardware::new());
    let response = device.handle_command(method("HvacRestart", json!(11))).unwrap();
    assert_eq!(response.status, MethodStatus::Failed);
    assert_eq!(response.status.code(), 500);
    assert_eq!(
        response.message.as_str(),
        "HvacRestart called. Restart Failed. Seconds out of range: 11"
    );

    run_for(&mut device, 20_000);
    assert_eq!(device.hw().reboots, 0);
}

#[test]
fn restart_with_text_payload_fails() {
    let mut device = make_device(MockHardware::new());
    let response = device.handle_command(method("HvacRestart", json!("5"))).unwrap();
    assert_eq!(response.status, MethodStatus::Failed);
    assert!(response.message.is_empty());
    assert_eq!(response.body(), "\"\"");
    assert!(!device.scheduler().is_armed(TimerId::Restart));
}

#[test]
fn operating_led_methods() {
    let mut device = make_device(MockHardware::new());

    let on = device.handle_command(method("HvacOn", Value::Null)).unwrap();
    assert_eq!(on.message.as_str(), "HvacOn called");
    assert_eq!(device.hw().operating_led(), Some(true));
    assert!(device.app().is_operating());

    let off = device.handle_command(method("HvacOff", Value::Null)).unwrap();
    assert_eq!(off.status, MethodStatus::Succeeded);
    assert_eq!(device.hw().operating_led(), Some(false));
}

#[test]
fn unknown_method_not_found() {
    let mut device = make_device(MockHardware::new());
    let response = device.handle_command(method("HvacTurbo", Value::Null)).unwrap();
    assert_eq!(response.status, MethodStatus::NotFound);
    assert_eq!(response.body(), "\"Method not found\"");
}

fn noop_method(_: &mut TestDevice, method: &str, _: &Value) -> MethodResponse {
    MethodResponse::called(method)
}

#[test]
fn duplicate_binding_rejected() {
    let mut device = make_device(MockHardware::new());
    assert_eq!(
        device.bind_method("HvacOn", noop_method),
        Err(Error::Registry(RegistryError::Duplicate("HvacOn")))
    );
    assert!(device.method_names().eq(["HvacRestart", "HvacOn", "HvacOff"]));
}

// ── Network LED ───────────────────────────────────────────────

fn network_flashes(device: &TestDevice) -> usize {
    device
        .hw()
        .calls
        .iter()
        .filter(|c| **c == crate::mock_hw::IndicatorCall::NetworkLed(true))
        .count()
}

#[test]
fn network_led_init_burst_then_slow_blink() {
    let mut device = make_device(MockHardware::new());
    assert_eq!(device.hw().network_led(), Some(true));

    run_for(&mut device, 100);
    assert_eq!(device.hw().network_led(), Some(false));

    run_for(&mut device, 4_800);
    assert_eq!(network_flashes(&device), 25);

    // First slow blink: disconnected, on for 700 of 1400 ms.
    run_for(&mut device, 100);
    assert_eq!(network_flashes(&device), 26);
    run_for(&mut device, 600);
    assert_eq!(device.hw().network_led(), Some(true));
    run_for(&mut device, 100);
    assert_eq!(device.hw().network_led(), Some(false));
}

#[test]
fn connected_blink_is_mostly_on() {
    let mut device = make_device(MockHardware::new());
    connect(&mut device);
    run_for(&mut device, 5_000);
    assert_eq!(network_flashes(&device), 26);

    run_for(&mut device, 1_200);
    assert_eq!(device.hw().network_led(), Some(true));
    run_for(&mut device, 100);
    assert_eq!(device.hw().network_led(), Some(false));
}

// ── Deferred update ───────────────────────────────────────────

#[test]
fn update_allowed_in_quiet_window() {
    let mut hw = MockHardware::new();
    // 18:00 UTC is 04:00 at UTC+10.
    hw.utc_hour = Some(18);
    let mut device = make_device(hw);
    device.handle_command(AppCommand::UpdatePending(PendingUpdate::system(60)));
    assert!(device.sink().events.contains(&AppEvent::UpdateDeferred { minutes: 0 }));
    assert_eq!(device.cloud().reported_names(), vec!["DeferredUpdateRequest"]);
}

#[test]
fn update_deferred_during_the_day() {
    let mut hw = MockHardware::new();
    hw.utc_hour = Some(2);
    let mut device = make_device(hw);
    device.handle_command(AppCommand::UpdatePending(PendingUpdate::system(60)));
    assert!(device.sink().events.contains(&AppEvent::UpdateDeferred { minutes: 15 }));
}

#[test]
fn update_report_carries_type_and_status() {
    let mut hw = MockHardware::new();
    hw.utc_hour = Some(2);
    let mut device = make_device(hw);
    device.handle_command(AppCommand::UpdatePending(PendingUpdate {
        kind: UpdateKind::App,
        status: UpdateStatus::Final,
        max_deferral_minutes: 45,
    }));

    let Some((_, Owned::Text(text))) = device.cloud().reports.last() else {
        panic!("no deferred update report");
    };
    assert!(text.contains("Type: App, Status: Final, Max defer minutes: 45"));
    assert!(text.ends_with("Requested minutes: 15"));
}
