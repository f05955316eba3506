use crate::client::{BackendClient, ConnectOptions};
use shortlink_core::{CoalescingStorage, Result, Storage, StorageError, WritePolicy};
use std::sync::Arc;
use tracing::info;

/// Connects to every address in `addrs`, in order, and returns one storage.
///
/// A single address yields its [`BackendClient`] directly; several are
/// wrapped in a [`CoalescingStorage`] labelled by address, so reads try them
/// in the order given. Any address that fails to connect aborts the whole
/// call.
pub async fn connect_storage<A: AsRef<str>>(
    addrs: &[A],
    options: &ConnectOptions,
    write_policy: WritePolicy,
) -> Result<Arc<dyn Storage>> {
    let mut clients = Vec::with_capacity(addrs.len());
    for addr in addrs {
        let addr = addr.as_ref();
        clients.push((addr.to_string(), BackendClient::connect(addr, options).await?));
    }

    match clients.len() {
        0 => Err(StorageError::InvalidArgument(
            "at least one backend address is required".to_string(),
        )),
        1 => {
            let (addr, client) = clients.remove(0);
            info!(backend = %addr, "using a single storage backend");
            Ok(Arc::new(client))
        }
        n => {
            info!(backends = n, ?write_policy, "coalescing storage backends");
            let storage = CoalescingStorage::new(clients)?.with_write_policy(write_policy);
            Ok(Arc::new(storage))
        }
    }
}
