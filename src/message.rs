//! Inbound events and outbound payloads crossing the host boundary.

use serde::{Deserialize, Serialize};

/// Authority assumed for actors whose transport does not report one.
pub const DEFAULT_AUTHORITY: u8 = 1;

fn default_authority() -> u8 {
    DEFAULT_AUTHORITY
}

/// A chat message about to be dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    pub platform: String,
    pub channel_id: String,
    pub user_id: String,
    /// Raw content with transport markup already stripped.
    pub content: String,
    /// Actor permission level, compared against `commands.authority`.
    #[serde(default = "default_authority")]
    pub authority: u8,
}

impl InboundMessage {
    pub fn new(
        platform: impl Into<String>,
        channel_id: impl Into<String>,
        user_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            platform: platform.into(),
            channel_id: channel_id.into(),
            user_id: user_id.into(),
            content: content.into(),
            authority: DEFAULT_AUTHORITY,
        }
    }

    pub fn with_authority(mut self, authority: u8) -> Self {
        self.authority = authority;
        self
    }

    /// First whitespace-delimited token, treated as the invoked command.
    pub fn invoked_command(&self) -> &str {
        self.content.split_whitespace().next().unwrap_or("")
    }

    /// Second whitespace-delimited token, the argument of a command.
    pub fn argument(&self) -> Option<&str> {
        self.content.split_whitespace().nth(1)
    }
}

/// Outbound payload after filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// Transmit this text.
    Send(String),
    /// Transmit nothing at all. Not the same as sending an empty message.
    Suppressed,
}

impl Outbound {
    pub fn is_suppressed(&self) -> bool {
        matches!(self, Outbound::Suppressed)
    }
}
