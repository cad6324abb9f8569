//! Block record models.

use std::collections::BTreeSet;
use std::fmt;

/// Storage key of the platform-wide scope.
pub const GLOBAL_SCOPE_KEY: &str = "global";

/// The scope a block record applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    /// A single channel of a platform.
    Channel(String),
    /// Every channel of a platform.
    Global,
}

impl Scope {
    pub fn channel(id: impl Into<String>) -> Self {
        Scope::Channel(id.into())
    }

    /// The `scope_id` column value.
    ///
    /// A channel whose id is literally `global` shares the global row.
    pub fn key(&self) -> &str {
        match self {
            Scope::Channel(id) => id,
            Scope::Global => GLOBAL_SCOPE_KEY,
        }
    }

}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A stored block record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRecord {
    pub platform: String,
    pub scope: Scope,
    pub blocked_keywords: BTreeSet<String>,
    pub blocked_users: BTreeSet<String>,
    /// Meaningless for [`Scope::Global`].
    pub is_blocked_channel: bool,
}

impl BlockRecord {
    /// An empty record: nothing blocked.
    pub fn new(platform: impl Into<String>, scope: Scope) -> Self {
        Self {
            platform: platform.into(),
            scope,
            blocked_keywords: BTreeSet::new(),
            blocked_users: BTreeSet::new(),
            is_blocked_channel: false,
        }
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.blocked_keywords.insert(keyword.into());
        self
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.blocked_users.insert(user_id.into());
        self
    }

    pub fn blocked_channel(mut self, blocked: bool) -> Self {
        self.is_blocked_channel = blocked;
        self
    }

    /// Merge `fields` into this record.
    pub fn apply(&mut self, fields: &BlockFields) {
        if let Some(keywords) = &fields.blocked_keywords {
            self.blocked_keywords = keywords.clone();
        }
        if let Some(users) = &fields.blocked_users {
            self.blocked_users = users.clone();
        }
        if let Some(blocked) = fields.is_blocked_channel {
            self.is_blocked_channel = blocked;
        }
    }
}

/// A partial update for [`BlockRecord`]. `None` leaves a column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockFields {
    pub blocked_keywords: Option<BTreeSet<String>>,
    pub blocked_users: Option<BTreeSet<String>>,
    pub is_blocked_channel: Option<bool>,
}

impl BlockFields {
    pub fn keywords(keywords: BTreeSet<String>) -> Self {
        Self {
            blocked_keywords: Some(keywords),
            ..Self::default()
        }
    }

    pub fn users(users: BTreeSet<String>) -> Self {
        Self {
            blocked_users: Some(users),
            ..Self::default()
        }
    }

    pub fn channel_blocked(blocked: bool) -> Self {
        Self {
            is_blocked_channel: Some(blocked),
            ..Self::default()
        }
    }
}
