//! blockgate - message-gating policy engine for chat bots.
//!
//! Decides for every inbound message whether it reaches command dispatch,
//! manages per-channel and global block lists through administrative
//! commands, and filters outgoing messages by keyword or regex.

pub mod codec;
pub mod config;
pub mod db;
pub mod error;
pub mod gate;
pub mod host;
pub mod http;
pub mod message;
pub mod metrics;
pub mod telemetry;

pub use config::Config;
pub use error::{GateError, GateResult};
pub use host::{Host, HostEvent};
pub use message::{InboundMessage, Outbound};
