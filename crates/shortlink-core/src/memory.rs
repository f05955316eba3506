use crate::entry::ShortHash;
use crate::error::{Result, StorageError};
use crate::storage::Storage;
use async_trait::async_trait;
use dashmap::DashMap;
use tracing::trace;

/// Unbounded in-memory storage using DashMap.
///
/// DashMap shards its locks, so reads and writes to different keys proceed
/// without blocking each other. Entries never expire; use the moka-backed
/// entry cache when bounded size or TTL is needed.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    urls: DashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get(&self, hash: &ShortHash) -> Result<String> {
        match self.urls.get(hash.as_str()) {
            Some(url) => Ok(url.value().clone()),
            None => {
                trace!(hash = %hash, "memory storage miss");
                Err(StorageError::NotFound(hash.to_string()))
            }
        }
    }

    async fn put(&self, url: &str, hash: &ShortHash) -> Result<()> {
        self.urls.insert(hash.as_str().to_owned(), url.to_owned());
        Ok(())
    }
}
