//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Core config struct definitions (Config, ServerConfig, DatabaseConfig)
//! - [`commands`]: Administrative command names and the authority they require
//! - [`gate`]: Pipeline toggles and the two operator-authored rule tables
//! - [`outbound`]: Outbound content filter rules
//! - [`validation`]: Startup validation

mod commands;
mod gate;
mod outbound;
mod types;
pub mod validation;

pub use commands::CommandNames;
pub use gate::{ChannelCommandRule, CommandTargetRule, GateConfig, RuleMode, TargetKind};
pub use outbound::{OutboundConfig, OutboundFilterRule};
pub use types::{Config, ConfigError, DatabaseConfig, ServerConfig};
