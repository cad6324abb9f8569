//! Outbound content filter configuration.

use serde::Deserialize;

/// Outbound content filter configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutboundConfig {
    /// Enable outbound suppression (default: false).
    #[serde(default)]
    pub enabled: bool,
    /// Suppression rules; any match suppresses the message.
    #[serde(default)]
    pub rules: Vec<OutboundFilterRule>,
}

/// A single outbound suppression rule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutboundFilterRule {
    /// Plain substring, or a regex optionally wrapped in `/.../`.
    pub pattern: String,
    /// Treat `pattern` as a case-insensitive regular expression.
    #[serde(default)]
    pub regex: bool,
}
