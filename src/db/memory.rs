//! In-memory Block Store.

use super::{BlockFields, BlockRecord, BlockStore, DbError, Scope};
use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

/// DashMap-backed [`BlockStore`] with the same key semantics as the SQLite
/// table. Contents are lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: DashMap<(String, String), BlockRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with existing records. Later duplicates replace earlier ones.
    pub fn with_records(records: impl IntoIterator<Item = BlockRecord>) -> Self {
        let store = Self::new();
        for record in records {
            store.records.insert(key(&record.platform, &record.scope), record);
        }
        store
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn key(platform: &str, scope: &Scope) -> (String, String) {
    (platform.to_string(), scope.key().to_string())
}

#[async_trait]
impl BlockStore for MemoryStore {
    async fn get(&self, platform: &str, scope: &Scope) -> Result<Option<BlockRecord>, DbError> {
        Ok(self
            .records
            .get(&key(platform, scope))
            .map(|entry| entry.value().clone()))
    }

    async fn create(&self, record: &BlockRecord) -> Result<(), DbError> {
        match self.records.entry(key(&record.platform, &record.scope)) {
            Entry::Occupied(_) => Err(DbError::exists(&record.platform, &record.scope)),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(())
            }
        }
    }

    async fn upsert_fields(
        &self,
        platform: &str,
        scope: &Scope,
        fields: &BlockFields,
    ) -> Result<(), DbError> {
        let mut record = self
            .records
            .get_mut(&key(platform, scope))
            .ok_or_else(|| DbError::missing(platform, scope))?;
        record.apply(fields);
        Ok(())
    }
}
