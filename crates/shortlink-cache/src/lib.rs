//! The in-memory entry cache served by the cache service.
//!
//! [`MokaEntryCache`] implements the shared [`Storage`] contract, so the
//! same gRPC adapter serves it and callers can compose it with the durable
//! store through a coalescing storage.
//!
//! [`Storage`]: shortlink_core::Storage

pub mod entry_cache;

pub use entry_cache::{CacheConfig, MokaEntryCache};
