//! Core types and traits for the shortlink storage layer.
//!
//! This crate provides the [`Storage`] contract shared by the entry cache,
//! the durable store and the remote backend client, together with the
//! composite [`CoalescingStorage`] and the retry policy used by
//! transactional backends.

pub mod coalesce;
pub mod entry;
pub mod error;
pub mod memory;
pub mod retry;
pub mod storage;

pub use coalesce::{CoalescingStorage, WritePolicy};
pub use entry::{validate_url, ShortEntry, ShortHash};
pub use error::{AggregateError, BackendFailure, EntryError, Result, StorageError};
pub use memory::MemoryStorage;
pub use retry::{Idempotency, RetryPolicy};
pub use storage::{Storage, StorageExt};
