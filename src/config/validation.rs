//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use std::collections::HashSet;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("commands.{0} must not be empty")]
    EmptyCommandName(&'static str),
    #[error("command name '{0}' is used by more than one administrative command")]
    DuplicateCommandName(String),
    #[error("gate.command_targets[{0}] has an empty command")]
    EmptyTargetCommand(usize),
    #[error("gate.command_targets[{0}] has an empty target")]
    EmptyTarget(usize),
    #[error("gate.channel_commands[{0}] has an empty channel_id")]
    EmptyRuleChannel(usize),
    #[error("outbound.rules[{0}] has an empty pattern")]
    EmptyOutboundPattern(usize),
}

/// Validate a configuration, returning all errors found.
///
/// Shadowed rule-table rows are reported through `tracing::warn!` only:
/// they are legal configuration, just unreachable.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let commands = &config.commands;
    let named = [
        ("block_keyword", &commands.block_keyword),
        ("unblock_keyword", &commands.unblock_keyword),
        ("global_block_keyword", &commands.global_block_keyword),
        ("global_unblock_keyword", &commands.global_unblock_keyword),
        ("block_user", &commands.block_user),
        ("unblock_user", &commands.unblock_user),
        ("global_block_user", &commands.global_block_user),
        ("global_unblock_user", &commands.global_unblock_user),
        ("block_channel", &commands.block_channel),
        ("unblock_channel", &commands.unblock_channel),
    ];
    let mut seen = HashSet::new();
    for (field, name) in named {
        if name.trim().is_empty() {
            errors.push(ValidationError::EmptyCommandName(field));
        } else if !seen.insert(name.as_str()) {
            errors.push(ValidationError::DuplicateCommandName(name.clone()));
        }
    }

    for (idx, rule) in config.gate.command_targets.iter().enumerate() {
        if rule.command.is_empty() {
            errors.push(ValidationError::EmptyTargetCommand(idx));
        }
        if rule.target.is_empty() {
            errors.push(ValidationError::EmptyTarget(idx));
        }
    }

    for (idx, rule) in config.gate.channel_commands.iter().enumerate() {
        if rule.channel_id.is_empty() {
            errors.push(ValidationError::EmptyRuleChannel(idx));
        }
    }

    for (idx, rule) in config.outbound.rules.iter().enumerate() {
        if rule.pattern.is_empty() {
            errors.push(ValidationError::EmptyOutboundPattern(idx));
        }
    }

    for idx in shadowed_command_targets(config) {
        tracing::warn!(
            index = idx,
            command = %config.gate.command_targets[idx].command,
            "gate.command_targets entry is shadowed by an earlier entry for the same command"
        );
    }
    for idx in shadowed_channel_commands(config) {
        tracing::warn!(
            index = idx,
            channel = %config.gate.channel_commands[idx].channel_id,
            "gate.channel_commands entry is shadowed by an earlier entry for the same channel"
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Indices of command×target rows that can never be reached.
pub fn shadowed_command_targets(config: &Config) -> Vec<usize> {
    let mut seen = HashSet::new();
    config
        .gate
        .command_targets
        .iter()
        .enumerate()
        .filter(|(_, rule)| !seen.insert(rule.command.as_str()))
        .map(|(idx, _)| idx)
        .collect()
}

/// Indices of channel→command rows that can never be reached.
pub fn shadowed_channel_commands(config: &Config) -> Vec<usize> {
    let mut seen = HashSet::new();
    config
        .gate
        .channel_commands
        .iter()
        .enumerate()
        .filter(|(_, rule)| !seen.insert(rule.channel_id.as_str()))
        .map(|(idx, _)| idx)
        .collect()
}
