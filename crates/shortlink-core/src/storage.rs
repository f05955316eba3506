use crate::entry::ShortHash;
use crate::error::{Result, StorageError};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// A key/value store mapping short hashes to URLs.
///
/// Implemented by the in-memory entry cache, the durable store, the remote
/// backend client and the coalescing composite. Every implementation must be
/// safe to call concurrently from many tasks.
///
/// Dropping a returned future abandons the operation. Implementations must
/// not leave a partially applied write behind when that happens.
#[async_trait]
pub trait Storage: Send + Sync + 'static {
    /// Returns the URL stored under `hash`.
    ///
    /// Fails with [`StorageError::NotFound`] if the key is absent.
    async fn get(&self, hash: &ShortHash) -> Result<String>;

    /// Stores `url` under `hash`, replacing any previous value.
    async fn put(&self, url: &str, hash: &ShortHash) -> Result<()>;

    /// Releases the resources held by this storage.
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl<S: Storage + ?Sized> Storage for Arc<S> {
    async fn get(&self, hash: &ShortHash) -> Result<String> {
        (**self).get(hash).await
    }

    async fn put(&self, url: &str, hash: &ShortHash) -> Result<()> {
        (**self).put(url, hash).await
    }

    async fn close(&self) -> Result<()> {
        (**self).close().await
    }
}

#[async_trait]
impl<S: Storage + ?Sized> Storage for Box<S> {
    async fn get(&self, hash: &ShortHash) -> Result<String> {
        (**self).get(hash).await
    }

    async fn put(&self, url: &str, hash: &ShortHash) -> Result<()> {
        (**self).put(url, hash).await
    }

    async fn close(&self) -> Result<()> {
        (**self).close().await
    }
}

/// Deadline helpers available on every [`Storage`].
#[async_trait]
pub trait StorageExt: Storage {
    /// Like [`Storage::get`], failing with [`StorageError::Timeout`] once
    /// `timeout` elapses. The pending operation is dropped.
    async fn get_within(&self, hash: &ShortHash, timeout: Duration) -> Result<String> {
        tokio::time::timeout(timeout, self.get(hash))
            .await
            .map_err(|_| {
                StorageError::Timeout(format!("get '{}' exceeded {:?}", hash, timeout))
            })?
    }

    /// Like [`Storage::put`], failing with [`StorageError::Timeout`] once
    /// `timeout` elapses. The pending operation is dropped.
    async fn put_within(&self, url: &str, hash: &ShortHash, timeout: Duration) -> Result<()> {
        tokio::time::timeout(timeout, self.put(url, hash))
            .await
            .map_err(|_| {
                StorageError::Timeout(format!("put '{}' exceeded {:?}", hash, timeout))
            })?
    }
}

impl<S: Storage + ?Sized> StorageExt for S {}
