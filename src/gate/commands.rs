//! Administrative block commands.
//!
//! Every command is read-modify-write against the Block Store: `get`, compute
//! the new set, then `create` or `upsert_fields`. Two commands racing on the
//! same scope can lose an update; the last write wins.

use super::guard::is_self_action;
use super::notice::{Notice, Reach, Subject};
use crate::config::CommandNames;
use crate::db::{BlockFields, BlockRecord, BlockStore, Scope};
use crate::error::GateResult;
use crate::message::InboundMessage;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::info;

/// What an administrative command does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    BlockKeyword,
    UnblockKeyword,
    BlockUser,
    UnblockUser,
    BlockChannel,
    UnblockChannel,
}

/// A parsed administrative command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminCommand {
    pub action: AdminAction,
    /// Acts on the platform-wide scope instead of the current channel.
    pub global: bool,
    pub argument: Option<String>,
}

impl AdminCommand {
    /// Recognise `msg` as an administrative command by exact match of its
    /// first token against the configured names.
    pub fn parse(names: &CommandNames, msg: &InboundMessage) -> Option<Self> {
        let token = msg.invoked_command();
        let (action, global) = [
            (&names.block_keyword, AdminAction::BlockKeyword, false),
            (&names.unblock_keyword, AdminAction::UnblockKeyword, false),
            (&names.global_block_keyword, AdminAction::BlockKeyword, true),
            (&names.global_unblock_keyword, AdminAction::UnblockKeyword, true),
            (&names.block_user, AdminAction::BlockUser, false),
            (&names.unblock_user, AdminAction::UnblockUser, false),
            (&names.global_block_user, AdminAction::BlockUser, true),
            (&names.global_unblock_user, AdminAction::UnblockUser, true),
            (&names.block_channel, AdminAction::BlockChannel, false),
            (&names.unblock_channel, AdminAction::UnblockChannel, false),
        ]
        .into_iter()
        .find(|(name, _, _)| name.as_str() == token)
        .map(|(_, action, global)| (action, global))?;

        Some(Self {
            action,
            global,
            argument: msg.argument().map(str::to_string),
        })
    }

    /// Stable label for metrics and logs.
    pub fn label(&self) -> &'static str {
        match (self.action, self.global) {
            (AdminAction::BlockKeyword, false) => "block_keyword",
            (AdminAction::BlockKeyword, true) => "global_block_keyword",
            (AdminAction::UnblockKeyword, false) => "unblock_keyword",
            (AdminAction::UnblockKeyword, true) => "global_unblock_keyword",
            (AdminAction::BlockUser, false) => "block_user",
            (AdminAction::BlockUser, true) => "global_block_user",
            (AdminAction::UnblockUser, false) => "unblock_user",
            (AdminAction::UnblockUser, true) => "global_unblock_user",
            (AdminAction::BlockChannel, _) => "block_channel",
            (AdminAction::UnblockChannel, _) => "unblock_channel",
        }
    }

    fn subject(&self) -> Subject {
        match self.action {
            AdminAction::BlockKeyword | AdminAction::UnblockKeyword => Subject::Keyword,
            AdminAction::BlockUser | AdminAction::UnblockUser => Subject::User,
            AdminAction::BlockChannel | AdminAction::UnblockChannel => Subject::Channel,
        }
    }
}

/// Which set column a keyword/user command edits.
#[derive(Debug, Clone, Copy)]
enum SetField {
    Keywords,
    Users,
}

impl SetField {
    fn subject(self) -> Subject {
        match self {
            SetField::Keywords => Subject::Keyword,
            SetField::Users => Subject::User,
        }
    }

    fn of(self, record: &BlockRecord) -> &BTreeSet<String> {
        match self {
            SetField::Keywords => &record.blocked_keywords,
            SetField::Users => &record.blocked_users,
        }
    }

    fn fields(self, set: BTreeSet<String>) -> BlockFields {
        match self {
            SetField::Keywords => BlockFields::keywords(set),
            SetField::Users => BlockFields::users(set),
        }
    }

    fn seed(self, record: BlockRecord, value: &str) -> BlockRecord {
        match self {
            SetField::Keywords => record.with_keyword(value),
            SetField::Users => record.with_user(value),
        }
    }
}

/// Executes administrative commands against the Block Store.
pub struct BlockCommands {
    store: Arc<dyn BlockStore>,
    required_authority: u8,
    allow_self_operation: bool,
}

impl BlockCommands {
    pub fn new(
        store: Arc<dyn BlockStore>,
        required_authority: u8,
        allow_self_operation: bool,
    ) -> Self {
        Self {
            store,
            required_authority,
            allow_self_operation,
        }
    }

    /// Run `cmd` on behalf of the author of `msg`.
    ///
    /// Store errors (including a lost race on `create`) abort this command
    /// only and are returned to the caller to report.
    pub async fn execute(&self, msg: &InboundMessage, cmd: &AdminCommand) -> GateResult<Notice> {
        if msg.authority < self.required_authority {
            return Ok(Notice::InsufficientAuthority {
                required: self.required_authority,
            });
        }

        let Some(argument) = cmd.argument.as_deref().filter(|a| !a.is_empty()) else {
            return Ok(Notice::MissingArgument(cmd.subject()));
        };

        let guarded = matches!(cmd.subject(), Subject::User | Subject::Channel);
        if guarded
            && is_self_action(&msg.user_id, &msg.channel_id, argument, self.allow_self_operation)
        {
            return Ok(Notice::CannotTargetSelf);
        }

        let (scope, reach) = if cmd.global {
            (Scope::Global, Reach::Global)
        } else {
            (Scope::channel(&msg.channel_id), Reach::Channel)
        };
        let platform = msg.platform.as_str();

        let notice = match cmd.action {
            AdminAction::BlockKeyword => {
                self.add_member(platform, scope, reach, SetField::Keywords, argument)
                    .await?
            }
            AdminAction::UnblockKeyword => {
                self.remove_member(platform, scope, reach, SetField::Keywords, argument)
                    .await?
            }
            AdminAction::BlockUser => {
                self.add_member(platform, scope, reach, SetField::Users, argument)
                    .await?
            }
            AdminAction::UnblockUser => {
                self.remove_member(platform, scope, reach, SetField::Users, argument)
                    .await?
            }
            AdminAction::BlockChannel => self.set_channel_blocked(platform, argument, true).await?,
            AdminAction::UnblockChannel => {
                self.set_channel_blocked(platform, argument, false).await?
            }
        };

        if notice.is_mutation() {
            info!(
                command = cmd.label(),
                platform = %platform,
                actor = %msg.user_id,
                target = %argument,
                "Block list updated"
            );
        }
        Ok(notice)
    }

    async fn add_member(
        &self,
        platform: &str,
        scope: Scope,
        reach: Reach,
        field: SetField,
        value: &str,
    ) -> GateResult<Notice> {
        let subject = field.subject();
        let value_owned = value.to_string();

        match self.store.get(platform, &scope).await? {
            None => {
                let record = field.seed(BlockRecord::new(platform, scope), value);
                self.store.create(&record).await?;
            }
            Some(record) => {
                if field.of(&record).contains(value) {
                    return Ok(Notice::AlreadyBlocked {
                        subject,
                        value: value_owned,
                        reach,
                    });
                }
                let mut set = field.of(&record).clone();
                set.insert(value_owned.clone());
                self.store
                    .upsert_fields(platform, &scope, &field.fields(set))
                    .await?;
            }
        }

        Ok(Notice::Blocked {
            subject,
            value: value_owned,
            reach,
        })
    }

    async fn remove_member(
        &self,
        platform: &str,
        scope: Scope,
        reach: Reach,
        field: SetField,
        value: &str,
    ) -> GateResult<Notice> {
        let subject = field.subject();
        let value_owned = value.to_string();

        let record = match self.store.get(platform, &scope).await? {
            Some(record) if field.of(&record).contains(value) => record,
            _ => {
                return Ok(Notice::NotBlocked {
                    subject,
                    value: value_owned,
                    reach,
                });
            }
        };

        let mut set = field.of(&record).clone();
        set.remove(value);
        self.store
            .upsert_fields(platform, &scope, &field.fields(set))
            .await?;

        Ok(Notice::Unblocked {
            subject,
            value: value_owned,
            reach,
        })
    }

    async fn set_channel_blocked(
        &self,
        platform: &str,
        channel_id: &str,
        blocked: bool,
    ) -> GateResult<Notice> {
        let scope = Scope::channel(channel_id);
        let current = self.store.get(platform, &scope).await?;
        let is_blocked = current.as_ref().is_some_and(|r| r.is_blocked_channel);
        let value = channel_id.to_string();
        let subject = Subject::Channel;
        let reach = Reach::Channel;

        if is_blocked == blocked {
            return Ok(if blocked {
                Notice::AlreadyBlocked { subject, value, reach }
            } else {
                Notice::NotBlocked { subject, value, reach }
            });
        }

        match current {
            None => {
                // Only reachable when blocking: unblocking a missing record
                // returned NotBlocked above.
                let record = BlockRecord::new(platform, scope).blocked_channel(true);
                self.store.create(&record).await?;
            }
            Some(_) => {
                self.store
                    .upsert_fields(platform, &scope, &BlockFields::channel_blocked(blocked))
                    .await?;
            }
        }

        Ok(if blocked {
            Notice::Blocked { subject, value, reach }
        } else {
            Notice::Unblocked { subject, value, reach }
        })
    }
}
