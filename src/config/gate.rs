//! Decision pipeline configuration: toggles and rule tables.

use serde::Deserialize;

use super::types::default_true;

/// Toggles and rule tables consumed by the decision pipeline.
#[derive(Debug, Clone, Deserialize)]
pub struct GateConfig {
    /// Create a blocked record for every channel seen for the first time.
    #[serde(default)]
    pub auto_block_channels: bool,
    /// Allow actors to block/unblock themselves or their current channel
    /// (default: true).
    #[serde(default = "default_true")]
    pub allow_self_operation: bool,
    /// Let blocked users/channels still reach the administrative commands.
    #[serde(default)]
    pub allow_trigger: bool,
    /// Command×target allow/deny table. First entry per command wins.
    #[serde(default)]
    pub command_targets: Vec<CommandTargetRule>,
    /// Channel→single allowed command table. First entry per channel wins.
    #[serde(default)]
    pub channel_commands: Vec<ChannelCommandRule>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            auto_block_channels: false,
            allow_self_operation: true,
            allow_trigger: false,
            command_targets: Vec::new(),
            channel_commands: Vec::new(),
        }
    }
}

/// Which attribute of the message a [`CommandTargetRule`] compares against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    #[default]
    UserId,
    ChannelId,
    Platform,
}

/// How a matching [`CommandTargetRule`] is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleMode {
    /// The entry is inert but still shadows later entries for its command.
    Disabled,
    /// Only the target may invoke the command.
    Whitelist,
    /// The target may not invoke the command.
    #[default]
    Blacklist,
}

/// One row of the command×target table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommandTargetRule {
    /// Invoked command, including any prefix (e.g. `/help`).
    pub command: String,
    /// User id, channel id or platform name, depending on `kind`.
    pub target: String,
    #[serde(default)]
    pub kind: TargetKind,
    #[serde(default)]
    pub mode: RuleMode,
}

/// One row of the channel→command table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChannelCommandRule {
    pub channel_id: String,
    /// The only command this channel may invoke.
    pub command: String,
}
