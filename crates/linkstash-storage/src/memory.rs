use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use linkstash_core::repository::{ReadRepository, Repository, Result};
use linkstash_core::{Link, StorageError};

/// In-memory implementation of the repository traits using DashMap.
///
/// Follows the same rules as the SQLite backend: a key can be inserted once
/// and is never overwritten.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    storage: DashMap<String, String>,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self {
            storage: DashMap::new(),
        }
    }

    /// Creates a new in-memory repository with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: DashMap::with_capacity(capacity),
        }
    }
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.storage.get(key).map(|url| url.value().clone()))
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.storage.len() as u64)
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn insert(&self, link: &Link) -> Result<()> {
        // The entry guard holds the shard lock, so check-and-insert is atomic.
        match self.storage.entry(link.key.clone()) {
            Entry::Occupied(_) => Err(StorageError::Conflict(link.key.clone())),
            Entry::Vacant(slot) => {
                slot.insert(link.url.clone());
                Ok(())
            }
        }
    }
}
