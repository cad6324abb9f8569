//! Block record repository for database queries.
//!
//! Keyword and user sets are stored as JSON arrays.

use super::models::{BlockFields, BlockRecord, Scope};
use crate::db::DbError;
use sqlx::SqlitePool;
use std::collections::BTreeSet;

/// Repository for block record operations.
pub struct BlockRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> BlockRepository<'a> {
    /// Create a new block repository.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Fetch the record for `(platform, scope)`, if any.
    pub async fn get(&self, platform: &str, scope: &Scope) -> Result<Option<BlockRecord>, DbError> {
        let row = sqlx::query_as::<_, (String, String, bool)>(
            r#"
            SELECT blocked_keywords, blocked_users, is_blocked_channel
            FROM blocked_scopes
            WHERE platform = ? AND scope_id = ?
            "#,
        )
        .bind(platform)
        .bind(scope.key())
        .fetch_optional(self.pool)
        .await?;

        let Some((keywords, users, is_blocked_channel)) = row else {
            return Ok(None);
        };

        Ok(Some(BlockRecord {
            platform: platform.to_string(),
            scope: scope.clone(),
            blocked_keywords: decode_set(&keywords)?,
            blocked_users: decode_set(&users)?,
            is_blocked_channel,
        }))
    }

    /// Insert a new record. Fails with [`DbError::RecordExists`] on a
    /// primary-key collision.
    pub async fn create(&self, record: &BlockRecord) -> Result<(), DbError> {
        let result = sqlx::query(
            r#"
            INSERT INTO blocked_scopes
                (platform, scope_id, blocked_keywords, blocked_users, is_blocked_channel)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.platform)
        .bind(record.scope.key())
        .bind(encode_set(&record.blocked_keywords)?)
        .bind(encode_set(&record.blocked_users)?)
        .bind(record.is_blocked_channel)
        .execute(self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(DbError::exists(&record.platform, &record.scope))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Merge `fields` into an existing record. Fails with
    /// [`DbError::RecordMissing`] if there is no row to update.
    pub async fn upsert_fields(
        &self,
        platform: &str,
        scope: &Scope,
        fields: &BlockFields,
    ) -> Result<(), DbError> {
        let keywords = fields.blocked_keywords.as_ref().map(encode_set).transpose()?;
        let users = fields.blocked_users.as_ref().map(encode_set).transpose()?;

        let result = sqlx::query(
            r#"
            UPDATE blocked_scopes
            SET blocked_keywords = COALESCE(?, blocked_keywords),
                blocked_users = COALESCE(?, blocked_users),
                is_blocked_channel = COALESCE(?, is_blocked_channel)
            WHERE platform = ? AND scope_id = ?
            "#,
        )
        .bind(keywords)
        .bind(users)
        .bind(fields.is_blocked_channel)
        .bind(platform)
        .bind(scope.key())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::missing(platform, scope));
        }
        Ok(())
    }

    /// Number of stored records across all platforms.
    pub async fn count(&self) -> Result<i64, DbError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM blocked_scopes")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}

fn encode_set(set: &BTreeSet<String>) -> Result<String, DbError> {
    serde_json::to_string(set).map_err(DbError::Encoding)
}

fn decode_set(raw: &str) -> Result<BTreeSet<String>, DbError> {
    serde_json::from_str(raw).map_err(DbError::Encoding)
}
