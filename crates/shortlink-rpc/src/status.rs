//! Mapping between [`StorageError`] and gRPC [`Status`].

use shortlink_core::{ShortHash, StorageError};
use tonic::{Code, Status};

fn code_for(error: &StorageError) -> Code {
    match error {
        StorageError::NotFound(_) => Code::NotFound,
        StorageError::Unavailable(_) => Code::Unavailable,
        StorageError::Timeout(_) => Code::DeadlineExceeded,
        StorageError::Conflict(_) => Code::Aborted,
        StorageError::Ambiguous(_) => Code::Unknown,
        StorageError::Cancelled => Code::Cancelled,
        StorageError::InvalidArgument(_) => Code::InvalidArgument,
        StorageError::InvalidData(_) => Code::DataLoss,
        StorageError::Query(_) | StorageError::SchemaBootstrap(_) => Code::Internal,
        StorageError::Backend { source, .. } => code_for(source),
        StorageError::Aggregate(agg) if agg.all_not_found() => Code::NotFound,
        StorageError::Aggregate(_) => Code::Unavailable,
    }
}

/// Converts a storage error into the status returned to gRPC callers.
pub fn into_status(error: StorageError) -> Status {
    Status::new(code_for(&error), error.to_string())
}

/// Converts a status received from a remote backend into a storage error.
///
/// `hash` is the key of the failed call, so a remote miss keeps the same
/// shape as a local one.
pub fn from_status(status: Status, hash: &ShortHash) -> StorageError {
    let message = status.message().to_string();

    match status.code() {
        Code::NotFound => StorageError::NotFound(hash.to_string()),
        Code::Unavailable => StorageError::Unavailable(message),
        Code::DeadlineExceeded => StorageError::Timeout(message),
        Code::Cancelled => StorageError::Cancelled,
        Code::Aborted | Code::ResourceExhausted => StorageError::Conflict(message),
        Code::Unknown => StorageError::Ambiguous(message),
        Code::InvalidArgument | Code::OutOfRange | Code::FailedPrecondition => {
            StorageError::InvalidArgument(message)
        }
        Code::DataLoss => StorageError::InvalidData(message),
        _ => StorageError::Query(format!("{}: {}", status.code(), message)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shortlink_core::{AggregateError, BackendFailure};

    fn hash() -> ShortHash {
        ShortHash::parse("00000000").unwrap()
    }

    #[test]
    fn not_found_round_trips() {
        let status = into_status(StorageError::NotFound("00000000".into()));
        assert_eq!(status.code(), Code::NotFound);

        let err = from_status(status, &hash());
        assert!(matches!(err, StorageError::NotFound(ref h) if h == "00000000"));
    }

    #[test]
    fn transient_errors_stay_retryable_across_the_wire() {
        for err in [
            StorageError::Unavailable("down".into()),
            StorageError::Timeout("slow".into()),
            StorageError::Conflict("deadlock".into()),
        ] {
            let mapped = from_status(into_status(err.clone()), &hash());
            assert_eq!(
                std::mem::discriminant(&mapped),
                std::mem::discriminant(&err),
                "{err} changed kind"
            );
        }
    }

    #[test]
    fn backend_tag_uses_the_inner_code() {
        let err = StorageError::backend("http://cache", StorageError::Unavailable("down".into()));
        assert_eq!(into_status(err).code(), Code::Unavailable);
    }

    #[test]
    fn unanimous_miss_maps_to_not_found() {
        let err: StorageError = AggregateError::new(
            "get",
            vec![
                BackendFailure::new("a", StorageError::NotFound("00000000".into())),
                BackendFailure::new("b", StorageError::NotFound("00000000".into())),
            ],
        )
        .into();
        assert_eq!(into_status(err).code(), Code::NotFound);
    }

    #[test]
    fn mixed_aggregate_maps_to_unavailable() {
        let err: StorageError = AggregateError::new(
            "get",
            vec![
                BackendFailure::new("a", StorageError::Unavailable("down".into())),
                BackendFailure::new("b", StorageError::NotFound("00000000".into())),
            ],
        )
        .into();
        assert_eq!(into_status(err).code(), Code::Unavailable);
    }

    #[test]
    fn unexpected_codes_become_query_errors() {
        let err = from_status(Status::unimplemented("no such method"), &hash());
        assert!(matches!(err, StorageError::Query(_)));
    }
}
