//! Pipeline outcomes.

use serde::Serialize;
use std::fmt;

/// Outcome of the decision pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Continue to command dispatch.
    Allow,
    /// Continue to command dispatch through an exception path.
    AllowBypass,
    /// Drop silently. No reply is ever sent for a deny.
    Deny,
}

impl Verdict {
    pub fn is_allowed(self) -> bool {
        !matches!(self, Verdict::Deny)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Allow => "allow",
            Verdict::AllowBypass => "allow_bypass",
            Verdict::Deny => "deny",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The pipeline stage that produced a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    CommandTarget,
    ChannelCommand,
    TriggerOverride,
    BlockedChannel,
    BlockedUser,
    UnblockRescue,
    BlockedKeyword,
    /// Nothing matched.
    Fallthrough,
    /// The store could not be read; the pipeline failed closed.
    StoreFailure,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::CommandTarget => "command_target",
            Stage::ChannelCommand => "channel_command",
            Stage::TriggerOverride => "trigger_override",
            Stage::BlockedChannel => "blocked_channel",
            Stage::BlockedUser => "blocked_user",
            Stage::UnblockRescue => "unblock_rescue",
            Stage::BlockedKeyword => "blocked_keyword",
            Stage::Fallthrough => "fallthrough",
            Stage::StoreFailure => "store_failure",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A terminal verdict together with the stage that reached it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub verdict: Verdict,
    pub stage: Stage,
}

impl Decision {
    pub const fn new(verdict: Verdict, stage: Stage) -> Self {
        Self { verdict, stage }
    }

    pub const fn allow(stage: Stage) -> Self {
        Self::new(Verdict::Allow, stage)
    }

    pub const fn bypass(stage: Stage) -> Self {
        Self::new(Verdict::AllowBypass, stage)
    }

    pub const fn deny(stage: Stage) -> Self {
        Self::new(Verdict::Deny, stage)
    }

    pub fn is_allowed(&self) -> bool {
        self.verdict.is_allowed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bypass_counts_as_allowed() {
        assert!(Verdict::Allow.is_allowed());
        assert!(Verdict::AllowBypass.is_allowed());
        assert!(!Verdict::Deny.is_allowed());
    }

    #[test]
    fn decision_serializes_with_labels() {
        let json = serde_json::to_string(&Decision::bypass(Stage::UnblockRescue)).unwrap();
        assert_eq!(json, r#"{"verdict":"allow_bypass","stage":"unblock_rescue"}"#);
    }
}
