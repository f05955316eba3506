use crate::retry::Idempotency;
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors raised while validating entries at the service boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    #[error("invalid short hash: {0}")]
    InvalidHash(String),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// The key is absent. This is an application-level miss, not a failure
    /// of the backend.
    #[error("url for hash '{0}' not found")]
    NotFound(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    /// The transaction was rolled back by the engine (deadlock, lock wait,
    /// serialization failure) and can be re-run.
    #[error("storage transaction conflict: {0}")]
    Conflict(String),
    /// The operation may or may not have been applied.
    #[error("storage operation outcome unknown: {0}")]
    Ambiguous(String),
    #[error("storage operation cancelled")]
    Cancelled,
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("schema bootstrap failed: {0}")]
    SchemaBootstrap(String),
    #[error("backend {endpoint}: {source}")]
    Backend {
        endpoint: String,
        #[source]
        source: Box<StorageError>,
    },
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}

impl StorageError {
    /// Tags an error with the endpoint of the backend that produced it.
    pub fn backend(endpoint: impl Into<String>, source: StorageError) -> Self {
        StorageError::Backend {
            endpoint: endpoint.into(),
            source: Box::new(source),
        }
    }

    /// Returns `true` if the error is a miss, looking through backend tags.
    ///
    /// Aggregated failures are never reported as a miss here, use
    /// [`AggregateError::all_not_found`] to inspect them.
    pub fn is_not_found(&self) -> bool {
        match self {
            StorageError::NotFound(_) => true,
            StorageError::Backend { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    /// Returns `true` if re-running the operation is safe and may succeed.
    pub fn is_retryable(&self, idempotency: Idempotency) -> bool {
        match self {
            StorageError::Unavailable(_) | StorageError::Timeout(_) | StorageError::Conflict(_) => {
                true
            }
            StorageError::Ambiguous(_) => idempotency == Idempotency::Idempotent,
            StorageError::Backend { source, .. } => source.is_retryable(idempotency),
            _ => false,
        }
    }
}

impl From<EntryError> for StorageError {
    fn from(value: EntryError) -> Self {
        StorageError::InvalidArgument(value.to_string())
    }
}

/// The error reported by one member of a coalescing group.
#[derive(Debug, Clone)]
pub struct BackendFailure {
    pub backend: String,
    pub error: StorageError,
}

impl BackendFailure {
    pub fn new(backend: impl Into<String>, error: StorageError) -> Self {
        Self {
            backend: backend.into(),
            error,
        }
    }
}

/// Every member of a coalescing group failed.
#[derive(Debug, Clone)]
pub struct AggregateError {
    operation: &'static str,
    failures: Vec<BackendFailure>,
}

impl AggregateError {
    pub fn new(operation: &'static str, failures: Vec<BackendFailure>) -> Self {
        Self {
            operation,
            failures,
        }
    }

    /// The operation that failed (`get`, `put` or `close`).
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Per-backend failures, in group order.
    pub fn failures(&self) -> &[BackendFailure] {
        &self.failures
    }

    /// Returns `true` if every backend reported a miss.
    pub fn all_not_found(&self) -> bool {
        !self.failures.is_empty() && self.failures.iter().all(|f| f.error.is_not_found())
    }
}

impl Display for AggregateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} failed on {} backend(s): [",
            self.operation,
            self.failures.len()
        )?;
        for (i, failure) in self.failures.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", failure.backend, failure.error)?;
        }
        f.write_str("]")
    }
}

impl std::error::Error for AggregateError {}
