use crate::entry::ShortHash;
use crate::error::{AggregateError, BackendFailure, Result, StorageError};
use crate::storage::Storage;
use async_trait::async_trait;
use tracing::{debug, trace, warn};

/// How [`CoalescingStorage::put`] distributes a write over its members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WritePolicy {
    /// Stop at the first member that accepts the write. A write absorbed by
    /// a cache member alone is not durable.
    #[default]
    FirstSuccess,
    /// Write to every member in order. Succeeds if at least one member
    /// accepted the write.
    All,
}

#[derive(Debug)]
struct Member<S> {
    label: String,
    storage: S,
}

/// A storage composed of several backends tried in a fixed order.
///
/// The order given at construction is the priority order. Placing a cache
/// before the durable store gives read-through caching: reads are answered
/// by the first member that has the key, and no further members are
/// consulted.
///
/// # Operation Strategy
///
/// - **Get**: try each member in order, return the first success.
/// - **Put**: see [`WritePolicy`].
/// - **Close**: close every member, even after a failure.
///
/// When every member fails, the error is an [`AggregateError`] that keeps
/// each member's label and error. A unanimous miss is reported the same way;
/// callers that need to tell it apart can use
/// [`AggregateError::all_not_found`].
#[derive(Debug)]
pub struct CoalescingStorage<S> {
    members: Vec<Member<S>>,
    write_policy: WritePolicy,
}

impl<S: Storage> CoalescingStorage<S> {
    /// Creates a composite from labelled members in priority order.
    ///
    /// # Arguments
    ///
    /// * `members` - `(label, storage)` pairs; the label identifies the
    ///   member in errors and logs (typically its dial address)
    pub fn new<L: Into<String>>(members: impl IntoIterator<Item = (L, S)>) -> Result<Self> {
        let members: Vec<_> = members
            .into_iter()
            .map(|(label, storage)| Member {
                label: label.into(),
                storage,
            })
            .collect();

        if members.is_empty() {
            return Err(StorageError::InvalidArgument(
                "coalescing storage needs at least one backend".to_string(),
            ));
        }

        Ok(Self {
            members,
            write_policy: WritePolicy::default(),
        })
    }

    pub fn with_write_policy(mut self, write_policy: WritePolicy) -> Self {
        self.write_policy = write_policy;
        self
    }

    pub fn write_policy(&self) -> WritePolicy {
        self.write_policy
    }

    /// Member labels in priority order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|m| m.label.as_str())
    }

    async fn put_first_success(&self, url: &str, hash: &ShortHash) -> Result<()> {
        let mut failures = Vec::with_capacity(self.members.len());

        for member in &self.members {
            match member.storage.put(url, hash).await {
                Ok(()) => {
                    debug!(hash = %hash, backend = %member.label, "put accepted");
                    return Ok(());
                }
                Err(err) => {
                    debug!(
                        hash = %hash,
                        backend = %member.label,
                        error = %err,
                        "put failed, trying next backend"
                    );
                    failures.push(BackendFailure::new(&member.label, err));
                }
            }
        }

        Err(AggregateError::new("put", failures).into())
    }

    async fn put_all(&self, url: &str, hash: &ShortHash) -> Result<()> {
        let mut failures = Vec::new();

        for member in &self.members {
            match member.storage.put(url, hash).await {
                Ok(()) => trace!(hash = %hash, backend = %member.label, "put replicated"),
                Err(err) => failures.push(BackendFailure::new(&member.label, err)),
            }
        }

        if failures.len() == self.members.len() {
            return Err(AggregateError::new("put", failures).into());
        }

        for failure in &failures {
            warn!(
                hash = %hash,
                backend = %failure.backend,
                error = %failure.error,
                "put not replicated to backend"
            );
        }
        Ok(())
    }
}

#[async_trait]
impl<S: Storage> Storage for CoalescingStorage<S> {
    async fn get(&self, hash: &ShortHash) -> Result<String> {
        let mut failures = Vec::with_capacity(self.members.len());

        for member in &self.members {
            match member.storage.get(hash).await {
                Ok(url) => {
                    debug!(hash = %hash, backend = %member.label, "get answered");
                    return Ok(url);
                }
                Err(err) => {
                    trace!(
                        hash = %hash,
                        backend = %member.label,
                        error = %err,
                        "get failed, trying next backend"
                    );
                    failures.push(BackendFailure::new(&member.label, err));
                }
            }
        }

        Err(AggregateError::new("get", failures).into())
    }

    async fn put(&self, url: &str, hash: &ShortHash) -> Result<()> {
        match self.write_policy {
            WritePolicy::FirstSuccess => self.put_first_success(url, hash).await,
            WritePolicy::All => self.put_all(url, hash).await,
        }
    }

    async fn close(&self) -> Result<()> {
        let mut failures = Vec::new();

        for member in &self.members {
            if let Err(err) = member.storage.close().await {
                warn!(backend = %member.label, error = %err, "failed to close backend");
                failures.push(BackendFailure::new(&member.label, err));
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(AggregateError::new("close", failures).into())
        }
    }
}
