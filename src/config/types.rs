//! Core configuration types and loading.

use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;
use thiserror::Error;

use super::commands::CommandNames;
use super::gate::GateConfig;
use super::outbound::OutboundConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration.
///
/// Read once at startup. Every section is optional; an empty file yields a
/// gate with all toggles off and empty rule tables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Host process settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Administrative command names.
    #[serde(default)]
    pub commands: CommandNames,
    /// Decision pipeline toggles and rule tables.
    #[serde(default)]
    pub gate: GateConfig,
    /// Outbound content filter.
    #[serde(default)]
    pub outbound: OutboundConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }
}

/// Host process configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Prometheus metrics HTTP port (default: 9090, 0 disables).
    pub metrics_port: Option<u16>,
    /// Address the metrics endpoint binds to (default: 0.0.0.0).
    #[serde(default = "default_metrics_bind")]
    pub metrics_bind: IpAddr,
    /// Log every terminal verdict at info level instead of debug.
    #[serde(default)]
    pub log_decisions: bool,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to SQLite database file, or `:memory:`.
    #[serde(default = "default_database_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            metrics_port: None,
            metrics_bind: default_metrics_bind(),
            log_decisions: false,
        }
    }
}

fn default_metrics_bind() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_database_path() -> String {
    "blockgate.db".to_string()
}

pub(super) fn default_true() -> bool {
    true
}
