use thiserror::Error;
use tonic::Status;

use shortlink_core::{ShortEntry, ShortHash};

use crate::storage::v1::{GetRequest, PutRequest};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("hash is required")]
    MissingHash,
    #[error("url is required")]
    MissingUrl,
    #[error("hash is malformed: {0}")]
    MalformedHash(String),
}

impl From<ConversionError> for Status {
    fn from(error: ConversionError) -> Self {
        Status::invalid_argument(error.to_string())
    }
}

fn parse_hash(raw: &str) -> Result<ShortHash, ConversionError> {
    if raw.is_empty() {
        return Err(ConversionError::MissingHash);
    }
    ShortHash::parse(raw).map_err(|e| ConversionError::MalformedHash(e.to_string()))
}

impl TryFrom<&GetRequest> for ShortHash {
    type Error = ConversionError;

    fn try_from(request: &GetRequest) -> Result<Self, Self::Error> {
        parse_hash(&request.hash)
    }
}

impl TryFrom<&PutRequest> for ShortEntry {
    type Error = ConversionError;

    fn try_from(request: &PutRequest) -> Result<Self, Self::Error> {
        let hash = parse_hash(&request.hash)?;
        if request.url.is_empty() {
            return Err(ConversionError::MissingUrl);
        }
        Ok(ShortEntry {
            hash,
            url: request.url.clone(),
        })
    }
}

impl From<&ShortHash> for GetRequest {
    fn from(hash: &ShortHash) -> Self {
        GetRequest {
            hash: hash.to_string(),
        }
    }
}

impl PutRequest {
    pub fn new(url: impl Into<String>, hash: &ShortHash) -> Self {
        PutRequest {
            url: url.into(),
            hash: hash.to_string(),
        }
    }
}

impl From<&ShortEntry> for PutRequest {
    fn from(entry: &ShortEntry) -> Self {
        PutRequest::new(entry.url.clone(), &entry.hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_request_carries_entry_unchanged() {
        let entry = ShortEntry::new("https://example.com/page");
        let request = PutRequest::from(&entry);

        assert_eq!(request.url, "https://example.com/page");
        assert_eq!(request.hash, entry.hash.as_str());
        assert_eq!(ShortEntry::try_from(&request).unwrap(), entry);
    }

    #[test]
    fn get_request_with_empty_hash_is_missing() {
        let request = GetRequest {
            hash: String::new(),
        };
        assert_eq!(
            ShortHash::try_from(&request).unwrap_err(),
            ConversionError::MissingHash
        );
    }

    #[test]
    fn get_request_with_malformed_hash() {
        let request = GetRequest {
            hash: "not/a/hash".to_string(),
        };
        assert!(matches!(
            ShortHash::try_from(&request),
            Err(ConversionError::MalformedHash(_))
        ));
    }

    #[test]
    fn put_request_without_url() {
        let request = PutRequest {
            url: String::new(),
            hash: "e40c292c".to_string(),
        };
        assert_eq!(
            ShortEntry::try_from(&request).unwrap_err(),
            ConversionError::MissingUrl
        );
    }

    #[test]
    fn conversion_error_is_invalid_argument() {
        let status: Status = ConversionError::MissingHash.into();
        assert_eq!(status.code(), tonic::Code::InvalidArgument);
    }
}
