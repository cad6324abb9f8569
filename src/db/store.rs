//! The Block Store contract shared by every backend.

use super::{BlockFields, BlockRecord, Database, DbError, Scope};
use async_trait::async_trait;

/// Keyed access to block records.
///
/// Each call is atomic for its own key and nothing more: callers doing
/// read-modify-write can lose an update to a concurrent writer of the same
/// `(platform, scope)`.
#[async_trait]
pub trait BlockStore: Send + Sync {
    /// Fetch the record for `(platform, scope)`, if any.
    async fn get(&self, platform: &str, scope: &Scope) -> Result<Option<BlockRecord>, DbError>;

    /// Insert a record whose key must not exist yet.
    async fn create(&self, record: &BlockRecord) -> Result<(), DbError>;

    /// Merge fields into a record that must already exist.
    async fn upsert_fields(
        &self,
        platform: &str,
        scope: &Scope,
        fields: &BlockFields,
    ) -> Result<(), DbError>;
}

#[async_trait]
impl BlockStore for Database {
    async fn get(&self, platform: &str, scope: &Scope) -> Result<Option<BlockRecord>, DbError> {
        self.blocks().get(platform, scope).await
    }

    async fn create(&self, record: &BlockRecord) -> Result<(), DbError> {
        self.blocks().create(record).await
    }

    async fn upsert_fields(
        &self,
        platform: &str,
        scope: &Scope,
        fields: &BlockFields,
    ) -> Result<(), DbError> {
        self.blocks().upsert_fields(platform, scope, fields).await
    }
}
