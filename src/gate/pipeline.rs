//! The decision pipeline.
//!
//! Every inbound message is evaluated by an ordered sequence of stages
//! before any command runs. The first stage that reaches a verdict ends
//! evaluation:
//!
//! ```text
//! 1 auto-block      side effect only (creates a blocked channel record)
//! 2 command×target  whitelist → Allow, blacklist hit / whitelist miss → Deny
//! 3 channel×command channel restricted to another command → Deny
//! 4 trigger override content names an admin command → AllowBypass
//! 5 blocked channel → Deny
//! 6 blocked user    (channel ∪ global) → Deny
//! 7 unblock rescue  unblock-keyword command naming a blocked keyword → AllowBypass
//! 8 blocked keyword first token ∈ (channel ∪ global) → Deny
//! 9 fallthrough     → Allow
//! ```

use super::rules::{self, RuleOutcome};
use super::verdict::{Decision, Stage};
use crate::config::Config;
use crate::db::{BlockRecord, BlockStore, DbError, Scope};
use crate::error::GateResult;
use crate::message::InboundMessage;
use crate::telemetry::DecisionTimer;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Keywords and users blocked in a channel or platform-wide, unioned fresh
/// for each decision.
#[derive(Debug, Default)]
pub struct BlockedUnion<'a> {
    pub keywords: BTreeSet<&'a str>,
    pub users: BTreeSet<&'a str>,
}

impl<'a> BlockedUnion<'a> {
    pub fn of(records: [Option<&'a BlockRecord>; 2]) -> Self {
        let mut union = Self::default();
        for record in records.into_iter().flatten() {
            union
                .keywords
                .extend(record.blocked_keywords.iter().map(String::as_str));
            union
                .users
                .extend(record.blocked_users.iter().map(String::as_str));
        }
        union
    }
}

/// Evaluates inbound messages against configuration and stored block records.
pub struct Pipeline {
    config: Arc<Config>,
    store: Arc<dyn BlockStore>,
}

impl Pipeline {
    pub fn new(config: Arc<Config>, store: Arc<dyn BlockStore>) -> Self {
        Self { config, store }
    }

    /// Evaluate `msg`, failing closed: a store error yields a deny at
    /// [`Stage::StoreFailure`].
    pub async fn decide(&self, msg: &InboundMessage) -> Decision {
        let _timer = DecisionTimer::new();
        let decision = match self.evaluate(msg).await {
            Ok(decision) => decision,
            Err(e) => {
                warn!(
                    platform = %msg.platform,
                    channel = %msg.channel_id,
                    error = %e,
                    "Block store unavailable; denying message"
                );
                crate::metrics::record_store_error(e.error_code());
                Decision::deny(Stage::StoreFailure)
            }
        };
        crate::metrics::record_decision(decision);
        decision
    }

    /// Evaluate `msg`, propagating store errors to the caller.
    pub async fn evaluate(&self, msg: &InboundMessage) -> GateResult<Decision> {
        let gate = &self.config.gate;
        let names = &self.config.commands;
        let command = msg.invoked_command();
        let channel_scope = Scope::channel(&msg.channel_id);

        let mut channel_record = self.store.get(&msg.platform, &channel_scope).await?;

        // Stage 1. Messages without a channel (direct messages) are never
        // auto-blocked.
        if gate.auto_block_channels && !msg.channel_id.is_empty() && channel_record.is_none() {
            channel_record = Some(self.auto_block(&msg.platform, channel_scope).await?);
        }

        // Stage 2
        match rules::command_target_outcome(&gate.command_targets, command, msg) {
            RuleOutcome::Allow => {
                return Ok(self.verdict(msg, Decision::allow(Stage::CommandTarget)));
            }
            RuleOutcome::Deny => {
                return Ok(self.verdict(msg, Decision::deny(Stage::CommandTarget)));
            }
            RuleOutcome::Continue => {}
        }

        // Stage 3
        if rules::channel_forbids(&gate.channel_commands, &msg.channel_id, command) {
            return Ok(self.verdict(msg, Decision::deny(Stage::ChannelCommand)));
        }

        // Stage 4
        if gate.allow_trigger && names.all().iter().any(|name| msg.content.contains(name)) {
            return Ok(self.verdict(msg, Decision::bypass(Stage::TriggerOverride)));
        }

        // Stage 5
        if channel_record.as_ref().is_some_and(|r| r.is_blocked_channel) {
            return Ok(self.verdict(msg, Decision::deny(Stage::BlockedChannel)));
        }

        let global_record = self.store.get(&msg.platform, &Scope::Global).await?;
        let blocked = BlockedUnion::of([channel_record.as_ref(), global_record.as_ref()]);

        // Stage 6
        if blocked.users.contains(msg.user_id.as_str()) {
            return Ok(self.verdict(msg, Decision::deny(Stage::BlockedUser)));
        }

        // Stage 7
        let unblocking = names
            .keyword_unblockers()
            .iter()
            .any(|name| msg.content.contains(name));
        if unblocking && blocked.keywords.iter().any(|kw| msg.content.contains(kw)) {
            return Ok(self.verdict(msg, Decision::bypass(Stage::UnblockRescue)));
        }

        // Stage 8
        if blocked.keywords.contains(command) {
            return Ok(self.verdict(msg, Decision::deny(Stage::BlockedKeyword)));
        }

        Ok(self.verdict(msg, Decision::allow(Stage::Fallthrough)))
    }

    /// Create a blocked record for a channel seen for the first time and
    /// return it for the rest of the evaluation.
    async fn auto_block(&self, platform: &str, scope: Scope) -> GateResult<BlockRecord> {
        let record = BlockRecord::new(platform, scope).blocked_channel(true);
        match self.store.create(&record).await {
            Ok(()) => {
                info!(
                    platform = %platform,
                    channel = %record.scope,
                    "Channel auto-blocked on first message"
                );
                Ok(record)
            }
            // Another message for this channel created it first.
            Err(DbError::RecordExists { .. }) => {
                let existing = self.store.get(platform, &record.scope).await?;
                Ok(existing.unwrap_or(record))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn verdict(&self, msg: &InboundMessage, decision: Decision) -> Decision {
        if self.config.server.log_decisions {
            info!(
                platform = %msg.platform,
                channel = %msg.channel_id,
                user = %msg.user_id,
                command = %msg.invoked_command(),
                verdict = %decision.verdict,
                stage = %decision.stage,
                "Gate decision"
            );
        } else {
            debug!(
                platform = %msg.platform,
                channel = %msg.channel_id,
                user = %msg.user_id,
                command = %msg.invoked_command(),
                verdict = %decision.verdict,
                stage = %decision.stage,
                "Gate decision"
            );
        }
        decision
    }
}
