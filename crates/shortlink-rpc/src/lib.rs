//! gRPC plumbing for the shortlink storage services.
//!
//! - [`BackendClient`] presents one remote storage service as a local
//!   [`Storage`].
//! - [`StorageGrpcServer`] exposes any [`Storage`] as the `storage.v1`
//!   service.
//! - [`connect_storage`] turns a list of backend addresses into a single
//!   storage handle, coalescing them when there is more than one.
//!
//! # Example
//!
//! ```rust,no_run
//! use shortlink_core::{ShortHash, Storage, WritePolicy};
//! use shortlink_rpc::{connect_storage, ConnectOptions};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // cache first, then the durable store
//! let addrs = ["http://127.0.0.1:5302", "http://127.0.0.1:5300"];
//! let storage = connect_storage(&addrs, &ConnectOptions::default(), WritePolicy::All).await?;
//!
//! let url = "https://example.com/page";
//! let hash = ShortHash::of(url);
//! storage.put(url, &hash).await?;
//! assert_eq!(storage.get(&hash).await?, url);
//!
//! storage.close().await?;
//! # Ok(())
//! # }
//! ```
//!
//! [`Storage`]: shortlink_core::Storage

pub mod cli;
pub mod client;
pub mod factory;
pub mod server;
pub mod status;
pub mod telemetry;

pub use client::{BackendClient, ConnectMode, ConnectOptions};
pub use factory::connect_storage;
pub use server::StorageGrpcServer;
