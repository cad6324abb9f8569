//! Administrative command names.
//!
//! The names double as bypass triggers: the trigger override (stage 4) and
//! the unblock rescue (stage 7) match them as substrings of raw content.

use serde::Deserialize;

/// Names of the ten administrative block/unblock commands.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CommandNames {
    /// Add a keyword to the current channel's block list.
    pub block_keyword: String,
    /// Remove a keyword from the current channel's block list.
    pub unblock_keyword: String,
    /// Add a keyword to the platform-wide block list.
    pub global_block_keyword: String,
    /// Remove a keyword from the platform-wide block list.
    pub global_unblock_keyword: String,
    /// Block a user in the current channel.
    pub block_user: String,
    /// Unblock a user in the current channel.
    pub unblock_user: String,
    /// Block a user platform-wide.
    pub global_block_user: String,
    /// Unblock a user platform-wide.
    pub global_unblock_user: String,
    /// Block a channel.
    pub block_channel: String,
    /// Unblock a channel.
    pub unblock_channel: String,
    /// Minimum actor authority level allowed to run these commands (default: 3).
    pub authority: u8,
}

impl Default for CommandNames {
    fn default() -> Self {
        Self {
            block_keyword: "添加屏蔽词".to_string(),
            unblock_keyword: "取消屏蔽词".to_string(),
            global_block_keyword: "全局添加屏蔽词".to_string(),
            global_unblock_keyword: "全局取消屏蔽词".to_string(),
            block_user: "拉黑用户".to_string(),
            unblock_user: "取消拉黑用户".to_string(),
            global_block_user: "全局拉黑用户".to_string(),
            global_unblock_user: "全局取消拉黑用户".to_string(),
            block_channel: "拉黑频道".to_string(),
            unblock_channel: "取消拉黑频道".to_string(),
            authority: 3,
        }
    }
}

impl CommandNames {
    /// All ten command names, in trigger-override scan order.
    pub fn all(&self) -> [&str; 10] {
        [
            &self.unblock_keyword,
            &self.global_unblock_keyword,
            &self.unblock_user,
            &self.global_unblock_user,
            &self.block_keyword,
            &self.global_block_keyword,
            &self.block_user,
            &self.global_block_user,
            &self.unblock_channel,
            &self.block_channel,
        ]
    }

    /// The keyword-removal command names checked by the unblock rescue.
    pub fn keyword_unblockers(&self) -> [&str; 2] {
        [&self.unblock_keyword, &self.global_unblock_keyword]
    }
}
