use crate::status::into_status;
use shortlink_core::{ShortEntry, ShortHash, Storage};
use shortlink_proto_schema::v1 as proto;
use shortlink_proto_schema::v1::storage_service_server::{StorageService, StorageServiceServer};
use std::net::SocketAddr;
use std::sync::Arc;
use tonic::transport::Server;
use tonic::{Request, Response, Status};
use tracing::{debug, info, warn};

/// Exposes a [`Storage`] as the `storage.v1.StorageService`.
pub struct StorageGrpcServer<S: Storage> {
    storage: Arc<S>,
}

impl<S: Storage> StorageGrpcServer<S> {
    pub fn new(storage: S) -> Self {
        Self::from_shared(Arc::new(storage))
    }

    /// Serves a storage that is also used elsewhere.
    pub fn from_shared(storage: Arc<S>) -> Self {
        Self { storage }
    }

    pub fn into_service(self) -> StorageServiceServer<Self> {
        StorageServiceServer::new(self)
    }
}

#[tonic::async_trait]
impl<S: Storage> StorageService for StorageGrpcServer<S> {
    async fn get(
        &self,
        request: Request<proto::GetRequest>,
    ) -> Result<Response<proto::GetResponse>, Status> {
        let hash = ShortHash::try_from(request.get_ref())?;

        let url = self.storage.get(&hash).await.map_err(|e| {
            debug!(hash = %hash, error = %e, "get failed");
            into_status(e)
        })?;

        Ok(Response::new(proto::GetResponse { url }))
    }

    async fn put(
        &self,
        request: Request<proto::PutRequest>,
    ) -> Result<Response<proto::PutResponse>, Status> {
        let entry = ShortEntry::try_from(request.get_ref())?;

        self.storage
            .put(&entry.url, &entry.hash)
            .await
            .map_err(|e| {
                warn!(hash = %entry.hash, error = %e, "put failed");
                into_status(e)
            })?;

        Ok(Response::new(proto::PutResponse {}))
    }
}

/// Serves `storage` on `addr`.
///
/// The standard gRPC health service is registered next to the storage
/// service and reports it as serving.
pub async fn serve<S: Storage>(
    addr: SocketAddr,
    storage: S,
) -> Result<(), tonic::transport::Error> {
    let (health_reporter, health_service) = tonic_health::server::health_reporter();
    health_reporter
        .set_serving::<StorageServiceServer<StorageGrpcServer<S>>>()
        .await;

    info!(%addr, "storage gRPC server listening");

    Server::builder()
        .add_service(health_service)
        .add_service(StorageGrpcServer::new(storage).into_service())
        .serve(addr)
        .await
}
