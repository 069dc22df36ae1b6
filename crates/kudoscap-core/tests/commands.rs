mod common;

use common::{enabled_enforcer, FakeHost};
use kudoscap_core::{
    handle_command, CommandOutcome, CommandSender, ConfigStore, Enforcer, KudosConfig,
    BYPASS_PERMISSION, RELOAD_PERMISSION,
};
use std::sync::Arc;

fn replies(outcome: CommandOutcome) -> Vec<String> {
    match outcome {
        CommandOutcome::Handled(lines) => lines.iter().map(|line| line.plain()).collect(),
        CommandOutcome::Unknown => panic!("command was not handled"),
    }
}

#[test]
fn bare_command_prints_usage() {
    let host = FakeHost::new();
    let (enforcer, _bus) = enabled_enforcer(&host, KudosConfig::default());
    let lines = replies(handle_command(&enforcer, CommandSender::Console, "kudoscap", &[]));
    assert_eq!(lines, vec!["Usage: /kudoscap [reload|bypass]".to_string()]);
}

#[test]
fn unrelated_commands_are_not_handled() {
    let host = FakeHost::new();
    let (enforcer, _bus) = enabled_enforcer(&host, KudosConfig::default());
    assert_eq!(
        handle_command(&enforcer, CommandSender::Console, "spawn", &[]),
        CommandOutcome::Unknown
    );
    assert_eq!(
        handle_command(&enforcer, CommandSender::Console, "kudoscap", &["frobnicate"]),
        CommandOutcome::Unknown
    );
}

#[test]
fn reload_requires_permission() {
    let host = FakeHost::new();
    let (enforcer, _bus) = enabled_enforcer(&host, KudosConfig::default());
    let actor = host.connect("curious");
    let lines = replies(handle_command(
        &enforcer,
        CommandSender::Actor(actor),
        "kudoscap",
        &["reload"],
    ));
    assert_eq!(lines, vec!["You don't have permission to reload KudosCap!".to_string()]);

    host.grant(actor, RELOAD_PERMISSION);
    let lines = replies(handle_command(
        &enforcer,
        CommandSender::Actor(actor),
        "KudosCap",
        &["RELOAD"],
    ));
    assert_eq!(lines, vec!["KudosCap config reloaded!".to_string()]);
}

#[test]
fn failed_reload_reports_error_and_keeps_previous_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kudoscap.toml");
    let store = Arc::new(ConfigStore::open(&path).unwrap());
    let host = FakeHost::new();
    let enforcer = Enforcer::new(store, host.services());
    enforcer.enable().unwrap();

    std::fs::write(&path, "[restrictions]\ndiamond-level = \"lots\"\n").unwrap();
    let lines = replies(handle_command(&enforcer, CommandSender::Console, "kudoscap", &["reload"]));
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("Reload failed:"));
    assert_eq!(enforcer.config().snapshot().restrictions.diamond_level, 35);
}

#[test]
fn bypass_reports_status_for_actors() {
    let host = FakeHost::new();
    let (enforcer, _bus) = enabled_enforcer(&host, KudosConfig::default());
    let regular = host.connect("regular");
    let staff = host.connect("staff");
    host.grant(staff, BYPASS_PERMISSION);

    let lines = replies(handle_command(
        &enforcer,
        CommandSender::Actor(regular),
        "kudoscap",
        &["bypass"],
    ));
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains(BYPASS_PERMISSION));
    assert_eq!(lines[1], "Your bypass status: Disabled");

    let lines = replies(handle_command(
        &enforcer,
        CommandSender::Actor(staff),
        "kudoscap",
        &["bypass"],
    ));
    assert_eq!(lines[1], "Your bypass status: Enabled");

    let lines = replies(handle_command(&enforcer, CommandSender::Console, "kudoscap", &["bypass"]));
    assert_eq!(lines.len(), 1);
}
