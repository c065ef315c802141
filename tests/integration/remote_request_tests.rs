//! Remote requests (desired properties and direct methods) interacting
//! with the periodic read/report cycle.

use serde_json::json;

use hvacmon::app::commands::AppCommand;
use hvacmon::app::device::{Device, MethodStatus};
use hvacmon::app::events::AppEvent;
use hvacmon::app::ports::AckStatus;
use hvacmon::app::service::AppService;
use hvacmon::config::HvacConfig;
use hvacmon::error::Rejection;
use hvacmon::hvac::mode::Mode;
use hvacmon::scheduler::TimerId;
use hvacmon::telemetry::reading::Reading;

use crate::mock_hw::{MockCloud, MockHardware, Owned, RecordingSink};

type TestDevice = Device<MockHardware, MockCloud, RecordingSink>;

fn started(readings: &[Reading]) -> TestDevice {
    let app = AppService::new(HvacConfig::default());
    let hw = MockHardware::with_readings(readings);
    let mut device = Device::new(app, hw, MockCloud::new(), RecordingSink::new()).unwrap();
    device.start().unwrap();
    device
}

fn run_for(device: &mut TestDevice, ms: u32) {
    for _ in 0..ms / 100 {
        device.tick(100).unwrap();
    }
}

fn set_target(device: &mut TestDevice, value: serde_json::Value) {
    device.handle_command(AppCommand::DesiredProperty {
        name: "TargetTemperature".into(),
        value,
    });
}

fn restart(device: &mut TestDevice, seconds: i32) -> MethodStatus {
    device
        .handle_command(AppCommand::DirectMethod {
            name: "HvacRestart".into(),
            payload: json!(seconds),
        })
        .map(|r| r.status)
        .unwrap_or(MethodStatus::NotFound)
}

// ── Target temperature ────────────────────────────────────────

#[test]
fn new_target_redecides_mode_immediately() {
    let mut device = started(&[Reading::new(25, 1000, 40)]);
    run_for(&mut device, 4_000);
    // A reading without a target leaves the mode undecided.
    assert!(device.hw().modes_shown().is_empty());

    set_target(&mut device, json!(22));
    assert_eq!(device.app().mode(), Mode::Cooling);

    set_target(&mut device, json!(30));
    assert_eq!(device.app().mode(), Mode::Heating);

    set_target(&mut device, json!(25));
    assert_eq!(device.hw().modes_shown(), vec![Mode::Cooling, Mode::Heating, Mode::Green]);
    assert_eq!(
        device.sink().mode_changes(),
        vec![
            (Mode::Unknown, Mode::Cooling),
            (Mode::Cooling, Mode::Heating),
            (Mode::Heating, Mode::Green),
        ]
    );
}

#[test]
fn rejected_target_keeps_previous_decision() {
    let mut device = started(&[Reading::new(25, 1000, 40)]);
    run_for(&mut device, 4_000);
    set_target(&mut device, json!(25));
    set_target(&mut device, json!(-1));

    assert_eq!(device.app().target().map(|t| t.celsius()), Some(25));
    assert_eq!(device.app().mode(), Mode::Green);
    assert!(device
        .sink()
        .events
        .contains(&AppEvent::Rejected(Rejection::OutOfRangeTarget(-1))));
    assert_eq!(
        device.cloud().acks.last(),
        Some(&("TargetTemperature".to_string(), Owned::Int(-1), AckStatus::Error))
    );
}

#[test]
fn target_bounds_are_inclusive() {
    let mut device = started(&[]);
    set_target(&mut device, json!(0));
    set_target(&mut device, json!(50));
    set_target(&mut device, json!(51));

    let statuses: Vec<AckStatus> = device.cloud().acks.iter().map(|(_, _, s)| *s).collect();
    assert_eq!(statuses, vec![AckStatus::Completed, AckStatus::Completed, AckStatus::Error]);
    assert_eq!(device.app().target().map(|t| t.celsius()), Some(50));
}

#[test]
fn mode_report_follows_target_change() {
    let readings = [Reading::new(22, 1000, 40); 8];
    let mut device = started(&readings);
    device.handle_command(AppCommand::ConnectionChanged(true));
    set_target(&mut device, json!(22));
    run_for(&mut device, 15_000);
    device.cloud_mut().clear();

    // Same reading, new target: only the mode is reported next time.
    set_target(&mut device, json!(20));
    run_for(&mut device, 15_000);

    assert_eq!(device.cloud().reported_names(), vec!["HvacOperatingMode"]);
    assert_eq!(
        device.cloud().reports[0].1,
        Owned::Text("Cooling".into())
    );
}

// ── Panel message ─────────────────────────────────────────────

#[test]
fn panel_message_rejections_keep_old_text() {
    let mut device = started(&[]);
    for text in ["Hello", "tab\there", ""] {
        device.handle_command(AppCommand::DesiredProperty {
            name: "PanelMessage".into(),
            value: json!(text),
        });
    }

    // The empty string is a valid message; the tab is not printable.
    assert_eq!(device.app().panel_message(), "");
    let statuses: Vec<AckStatus> = device.cloud().acks.iter().map(|(_, _, s)| *s).collect();
    assert_eq!(
        statuses,
        vec![AckStatus::Completed, AckStatus::Error, AckStatus::Completed]
    );
}

#[test]
fn panel_message_not_a_string() {
    let mut device = started(&[]);
    device.handle_command(AppCommand::DesiredProperty {
        name: "PanelMessage".into(),
        value: json!(42),
    });
    assert!(device.cloud().acks.is_empty());
    assert!(device
        .sink()
        .events
        .contains(&AppEvent::Rejected(Rejection::InvalidPayload)));
}

// ── Restart ───────────────────────────────────────────────────

#[test]
fn restart_rearm_replaces_pending_delay() {
    let mut device = started(&[]);
    assert_eq!(restart(&mut device, 10), MethodStatus::Succeeded);
    run_for(&mut device, 2_000);

    // Re-armed at 2 s with a 3 s delay: fires at 5 s, not 10 s.
    assert_eq!(restart(&mut device, 3), MethodStatus::Succeeded);
    assert_eq!(device.app().pending_restart().map(|d| d.secs()), Some(3));
    run_for(&mut device, 2_900);
    assert_eq!(device.hw().reboots, 0);
    run_for(&mut device, 100);
    assert_eq!(device.hw().reboots, 1);
    assert!(!device.scheduler().is_armed(TimerId::Restart));

    run_for(&mut device, 10_000);
    assert_eq!(device.hw().reboots, 1);
}

#[test]
fn restart_bounds_are_inclusive() {
    let mut device = started(&[]);
    assert_eq!(restart(&mut device, 2), MethodStatus::Failed);
    assert_eq!(restart(&mut device, 3), MethodStatus::Succeeded);
    assert_eq!(restart(&mut device, 10), MethodStatus::Succeeded);
    assert_eq!(restart(&mut device, 11), MethodStatus::Failed);
    assert_eq!(device.app().pending_restart().map(|d| d.secs()), Some(10));
}

#[test]
fn rejected_restart_keeps_pending_one() {
    let mut device = started(&[]);
    assert_eq!(restart(&mut device, 4), MethodStatus::Succeeded);
    assert_eq!(restart(&mut device, 60), MethodStatus::Failed);
    run_for(&mut device, 4_000);
    assert_eq!(device.hw().reboots, 1);
}
