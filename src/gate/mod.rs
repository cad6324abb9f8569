//! The message-gating policy engine.
//!
//! - [`pipeline`]: ordered allow/deny evaluation of every inbound message
//! - [`rules`]: first-match scans over the two operator rule tables
//! - [`guard`]: self-action check for user and channel block commands
//! - [`commands`]: the administrative block/unblock commands
//! - [`outbound`]: suppression of outgoing messages by keyword or regex

pub mod commands;
pub mod guard;
pub mod notice;
pub mod outbound;
pub mod pipeline;
pub mod rules;
pub mod verdict;

pub use commands::{AdminAction, AdminCommand, BlockCommands};
pub use guard::is_self_action;
pub use notice::{Notice, Reach, Subject};
pub use outbound::OutboundFilter;
pub use pipeline::{BlockedUnion, Pipeline};
pub use verdict::{Decision, Stage, Verdict};
