use crate::status::from_status;
use async_trait::async_trait;
use parking_lot::RwLock;
use shortlink_core::{Result, ShortHash, Storage, StorageError};
use shortlink_proto_schema::v1::storage_service_client::StorageServiceClient;
use shortlink_proto_schema::v1::{GetRequest, PutRequest};
use std::future::Future;
use std::time::Duration;
use tonic::transport::{Channel, Endpoint};
use tonic::Status;
use tracing::{debug, trace};
use typed_builder::TypedBuilder;

/// When the connection to a backend is established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectMode {
    /// Dial on first use. A successful `connect` says nothing about the
    /// remote being reachable.
    #[default]
    Lazy,
    /// Dial during `connect` and fail if the remote is unreachable.
    Eager,
}

/// Options applied to every [`BackendClient`] built from them.
#[derive(Debug, Clone, Default, TypedBuilder)]
pub struct ConnectOptions {
    #[builder(default)]
    pub mode: ConnectMode,
    /// Deadline of each request. An expired request fails with `Timeout`
    /// and is abandoned.
    #[builder(default, setter(strip_option))]
    pub request_timeout: Option<Duration>,
    #[builder(default, setter(strip_option))]
    pub connect_timeout: Option<Duration>,
}

/// A single remote storage service presented as a local [`Storage`].
///
/// Errors are tagged with the endpoint that produced them, see
/// [`StorageError::Backend`].
#[derive(Debug)]
pub struct BackendClient {
    endpoint: String,
    request_timeout: Option<Duration>,
    client: RwLock<Option<StorageServiceClient<Channel>>>,
}

impl BackendClient {
    /// Creates a client for the storage service at `addr`.
    ///
    /// `addr` is either a URI (`http://host:port`) or a bare `host:port`.
    /// An address that cannot be parsed always fails; an unreachable one
    /// only fails with [`ConnectMode::Eager`].
    pub async fn connect(addr: impl Into<String>, options: &ConnectOptions) -> Result<Self> {
        let addr = addr.into();

        let mut endpoint = Endpoint::from_shared(normalize(&addr)).map_err(|e| {
            StorageError::InvalidArgument(format!("invalid backend address '{}': {e}", addr))
        })?;
        if let Some(timeout) = options.connect_timeout {
            endpoint = endpoint.connect_timeout(timeout);
        }

        let channel = match options.mode {
            ConnectMode::Lazy => endpoint.connect_lazy(),
            ConnectMode::Eager => endpoint.connect().await.map_err(|e| {
                StorageError::backend(&addr, StorageError::Unavailable(e.to_string()))
            })?,
        };

        debug!(endpoint = %addr, mode = ?options.mode, "storage backend client created");

        Ok(Self {
            endpoint: addr,
            request_timeout: options.request_timeout,
            client: RwLock::new(Some(StorageServiceClient::new(channel))),
        })
    }

    /// The address this client was created with.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn is_closed(&self) -> bool {
        self.client.read().is_none()
    }

    fn client(&self) -> Result<StorageServiceClient<Channel>> {
        self.client.read().clone().ok_or_else(|| {
            self.tag(StorageError::Unavailable("client is closed".to_string()))
        })
    }

    fn tag(&self, error: StorageError) -> StorageError {
        StorageError::backend(&self.endpoint, error)
    }

    /// Awaits `call` within the request timeout, if any.
    async fn within<T, F>(&self, hash: &ShortHash, call: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, Status>>,
    {
        let result = match self.request_timeout {
            Some(timeout) => tokio::time::timeout(timeout, call).await.map_err(|_| {
                StorageError::Timeout(format!("no response within {:?}", timeout))
            })?,
            None => call.await,
        };
        result.map_err(|status| from_status(status, hash))
    }
}

#[async_trait]
impl Storage for BackendClient {
    async fn get(&self, hash: &ShortHash) -> Result<String> {
        let mut client = self.client()?;
        trace!(endpoint = %self.endpoint, hash = %hash, "forwarding get");

        let response = self
            .within(hash, client.get(GetRequest::from(hash)))
            .await
            .map_err(|e| self.tag(e))?;

        Ok(response.into_inner().url)
    }

    async fn put(&self, url: &str, hash: &ShortHash) -> Result<()> {
        let mut client = self.client()?;
        trace!(endpoint = %self.endpoint, hash = %hash, "forwarding put");

        self.within(hash, client.put(PutRequest::new(url, hash)))
            .await
            .map_err(|e| self.tag(e))?;

        Ok(())
    }

    async fn close(&self) -> Result<()> {
        match self.client.write().take() {
            Some(_) => debug!(endpoint = %self.endpoint, "storage backend client closed"),
            None => trace!(endpoint = %self.endpoint, "storage backend client already closed"),
        }
        Ok(())
    }
}

fn normalize(addr: &str) -> String {
    if addr.contains("://") {
        addr.to_string()
    } else {
        format!("http://{}", addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_addresses_get_http_scheme() {
        assert_eq!(normalize("127.0.0.1:5300"), "http://127.0.0.1:5300");
        assert_eq!(normalize("https://cache:5302"), "https://cache:5302");
    }

    #[tokio::test]
    async fn invalid_address_fails_even_when_lazy() {
        let err = BackendClient::connect("http://not a host", &ConnectOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn lazy_connect_succeeds_without_a_server() {
        let client = BackendClient::connect("127.0.0.1:1", &ConnectOptions::default())
            .await
            .unwrap();
        assert_eq!(client.endpoint(), "127.0.0.1:1");
        assert!(!client.is_closed());
    }

    #[tokio::test]
    async fn calls_after_close_fail_and_close_is_repeatable() {
        let client = BackendClient::connect("127.0.0.1:1", &ConnectOptions::default())
            .await
            .unwrap();

        client.close().await.unwrap();
        client.close().await.unwrap();
        assert!(client.is_closed());

        let err = client
            .get(&ShortHash::parse("00000000").unwrap())
            .await
            .unwrap_err();
        let StorageError::Backend { endpoint, source } = err else {
            panic!("expected a tagged error");
        };
        assert_eq!(endpoint, "127.0.0.1:1");
        assert!(matches!(*source, StorageError::Unavailable(_)));
    }
}
