//! `/kudoscap` administrative command: `reload` and an informational `bypass`.

use crate::actor::ActorId;
use crate::config::{BYPASS_PERMISSION, RELOAD_PERMISSION};
use crate::enforcer::Enforcer;
use crate::messaging::RichText;
use tracing::{info, warn};

pub const COMMAND_NAME: &str = "kudoscap";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandSender {
    /// Server console; holds every permission.
    Console,
    Actor(ActorId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Command handled; replies go back to the sender in order.
    Handled(Vec<RichText>),
    /// Not a command this module understands.
    Unknown,
}

impl CommandOutcome {
    fn reply(lines: impl IntoIterator<Item = RichText>) -> Self {
        CommandOutcome::Handled(lines.into_iter().collect())
    }
}

pub fn handle_command(
    enforcer: &Enforcer,
    sender: CommandSender,
    command: &str,
    args: &[&str],
) -> CommandOutcome {
    if !command.eq_ignore_ascii_case(COMMAND_NAME) {
        return CommandOutcome::Unknown;
    }
    let Some(sub) = args.first() else {
        return CommandOutcome::reply([RichText::new("<yellow>Usage: /kudoscap [reload|bypass]")]);
    };

    if sub.eq_ignore_ascii_case("reload") {
        return reload(enforcer, sender);
    }
    if sub.eq_ignore_ascii_case("bypass") {
        return bypass(enforcer, sender);
    }
    CommandOutcome::Unknown
}

fn sender_name(enforcer: &Enforcer, sender: CommandSender) -> String {
    match sender {
        CommandSender::Console => "console".to_string(),
        CommandSender::Actor(actor) => enforcer.services().actors.display_name(actor),
    }
}

fn has_permission(enforcer: &Enforcer, sender: CommandSender, permission: &str) -> bool {
    match sender {
        CommandSender::Console => true,
        CommandSender::Actor(actor) => enforcer.services().permissions.has_permission(actor, permission),
    }
}

fn reload(enforcer: &Enforcer, sender: CommandSender) -> CommandOutcome {
    if !has_permission(enforcer, sender, RELOAD_PERMISSION) {
        return CommandOutcome::reply([RichText::new(
            "<red>You don't have permission to reload KudosCap!",
        )]);
    }
    let name = sender_name(enforcer, sender);
    match enforcer.reload() {
        Ok(_) => {
            info!(by = %name, "config reloaded");
            CommandOutcome::reply([RichText::new("<green>KudosCap config reloaded!")])
        }
        Err(e) => {
            warn!(by = %name, error = %e, "config reload failed, keeping previous config");
            CommandOutcome::reply([RichText::new(format!("<red>Reload failed: {e}"))])
        }
    }
}

fn bypass(enforcer: &Enforcer, sender: CommandSender) -> CommandOutcome {
    let mut lines = vec![RichText::new(format!(
        "<yellow>This command is informational only. Grant the '{BYPASS_PERMISSION}' permission to toggle bypass."
    ))];
    if let CommandSender::Actor(actor) = sender {
        let enabled = enforcer.has_bypass(actor);
        lines.push(RichText::new(format!(
            "<yellow>Your bypass status: {}",
            if enabled { "<green>Enabled" } else { "<red>Disabled" }
        )));
        info!(
            actor = %sender_name(enforcer, sender),
            status = if enabled { "enabled" } else { "disabled" },
            "checked bypass status"
        );
    }
    CommandOutcome::reply(lines)
}
