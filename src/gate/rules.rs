//! Rule table evaluation.
//!
//! Both tables are scanned linearly and the first structurally matching row
//! is authoritative. Later rows with the same key are never consulted.

use crate::config::{ChannelCommandRule, CommandTargetRule, RuleMode, TargetKind};
use crate::message::InboundMessage;

/// Result of the command×target stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOutcome {
    /// Whitelisted subject: skip every later stage.
    Allow,
    Deny,
    /// No row, a disabled row, or a blacklist row for someone else.
    Continue,
}

/// First command×target row for `command`, if any.
pub fn find_command_target<'a>(
    rules: &'a [CommandTargetRule],
    command: &str,
) -> Option<&'a CommandTargetRule> {
    rules.iter().find(|rule| rule.command == command)
}

/// The message attribute a rule of `kind` compares against.
pub fn subject(kind: TargetKind, msg: &InboundMessage) -> &str {
    match kind {
        TargetKind::UserId => &msg.user_id,
        TargetKind::ChannelId => &msg.channel_id,
        TargetKind::Platform => &msg.platform,
    }
}

/// Apply the command×target table to `msg` invoking `command`.
pub fn command_target_outcome(
    rules: &[CommandTargetRule],
    command: &str,
    msg: &InboundMessage,
) -> RuleOutcome {
    let Some(rule) = find_command_target(rules, command) else {
        return RuleOutcome::Continue;
    };

    let matched = rule.target == subject(rule.kind, msg);
    match (rule.mode, matched) {
        (RuleMode::Blacklist, true) => RuleOutcome::Deny,
        (RuleMode::Whitelist, true) => RuleOutcome::Allow,
        // Whitelists are exclusive.
        (RuleMode::Whitelist, false) => RuleOutcome::Deny,
        (RuleMode::Blacklist, false) | (RuleMode::Disabled, _) => RuleOutcome::Continue,
    }
}

/// First channel→command row for `channel_id`, if any.
pub fn find_channel_rule<'a>(
    rules: &'a [ChannelCommandRule],
    channel_id: &str,
) -> Option<&'a ChannelCommandRule> {
    rules.iter().find(|rule| rule.channel_id == channel_id)
}

/// Whether `channel_id` is restricted to a command other than `command`.
pub fn channel_forbids(rules: &[ChannelCommandRule], channel_id: &str, command: &str) -> bool {
    find_channel_rule(rules, channel_id).is_some_and(|rule| rule.command != command)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(command: &str, target: &str, kind: TargetKind, mode: RuleMode) -> CommandTargetRule {
        CommandTargetRule {
            command: command.to_string(),
            target: target.to_string(),
            kind,
            mode,
        }
    }

    fn msg(user: &str) -> InboundMessage {
        InboundMessage::new("qq", "c1", user, "/x")
    }

    #[test]
    fn no_rule_continues() {
        assert_eq!(command_target_outcome(&[], "/x", &msg("u1")), RuleOutcome::Continue);
    }

    #[test]
    fn blacklist_denies_only_its_target() {
        let rules = [rule("/x", "u1", TargetKind::UserId, RuleMode::Blacklist)];
        assert_eq!(command_target_outcome(&rules, "/x", &msg("u1")), RuleOutcome::Deny);
        assert_eq!(command_target_outcome(&rules, "/x", &msg("u2")), RuleOutcome::Continue);
    }

    #[test]
    fn whitelist_is_exclusive() {
        let rules = [rule("/x", "u1", TargetKind::UserId, RuleMode::Whitelist)];
        assert_eq!(command_target_outcome(&rules, "/x", &msg("u1")), RuleOutcome::Allow);
        assert_eq!(command_target_outcome(&rules, "/x", &msg("u2")), RuleOutcome::Deny);
    }

    #[test]
    fn disabled_row_continues_and_shadows() {
        let rules = [
            rule("/x", "u1", TargetKind::UserId, RuleMode::Disabled),
            rule("/x", "u1", TargetKind::UserId, RuleMode::Blacklist),
        ];
        assert_eq!(command_target_outcome(&rules, "/x", &msg("u1")), RuleOutcome::Continue);
    }

    #[test]
    fn first_row_wins_even_when_later_row_would_match() {
        let rules = [
            rule("/x", "u1", TargetKind::UserId, RuleMode::Blacklist),
            rule("/x", "u2", TargetKind::UserId, RuleMode::Whitelist),
        ];
        assert_eq!(command_target_outcome(&rules, "/x", &msg("u2")), RuleOutcome::Continue);
        assert_eq!(command_target_outcome(&rules, "/x", &msg("u3")), RuleOutcome::Continue);
    }

    #[test]
    fn channel_and_platform_subjects() {
        let by_channel = [rule("/x", "c1", TargetKind::ChannelId, RuleMode::Blacklist)];
        assert_eq!(command_target_outcome(&by_channel, "/x", &msg("u1")), RuleOutcome::Deny);

        let by_platform = [rule("/x", "discord", TargetKind::Platform, RuleMode::Whitelist)];
        assert_eq!(command_target_outcome(&by_platform, "/x", &msg("u1")), RuleOutcome::Deny);
    }

    #[test]
    fn channel_restriction_uses_first_row() {
        let rules = [
            ChannelCommandRule {
                channel_id: "c1".to_string(),
                command: "status".to_string(),
            },
            ChannelCommandRule {
                channel_id: "c1".to_string(),
                command: "help".to_string(),
            },
        ];
        assert!(!channel_forbids(&rules, "c1", "status"));
        assert!(channel_forbids(&rules, "c1", "help"));
        assert!(!channel_forbids(&rules, "c2", "help"));
    }
}
