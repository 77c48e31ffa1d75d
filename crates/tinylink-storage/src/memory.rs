use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use jiff::Timestamp;
use tinylink_core::repository::{Repository, Result};
use tinylink_core::{ShortCode, ShortLink, StorageError};

/// In-memory implementation of the Repository trait using DashMap.
///
/// DashMap provides better concurrency than RwLock<HashMap> because it
/// uses sharded locks, allowing concurrent reads and writes to different
/// buckets without blocking.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    storage: DashMap<ShortCode, ShortLink>,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self {
            storage: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn insert(&self, link: ShortLink) -> Result<()> {
        // The entry holds the shard's write lock, so check-and-insert is atomic.
        match self.storage.entry(link.code().clone()) {
            Entry::Occupied(occupied) => Err(StorageError::Duplicate(occupied.key().to_string())),
            Entry::Vacant(vacant) => {
                vacant.insert(link);
                Ok(())
            }
        }
    }

    async fn get(&self, code: &ShortCode) -> Result<ShortLink> {
        self.storage
            .get(code)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StorageError::NotFound(code.to_string()))
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        Ok(self.storage.contains_key(code))
    }

    async fn purge_expired(&self, now: Timestamp) -> Result<u64> {
        let before = self.storage.len();
        self.storage.retain(|_, link| !link.is_expired_at(now));
        Ok(before.saturating_sub(self.storage.len()) as u64)
    }
}
