use crate::error::EntryError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

const HASH_LENGTH: usize = 8;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// 32-bit FNV-1a over the given bytes.
pub fn fnv1a32(bytes: &[u8]) -> u32 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u32::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

/// A validated short hash identifying a shortened URL.
///
/// Hashes are exactly 8 ASCII alphanumeric characters. Hashes produced by
/// [`ShortHash::of`] are the lowercase hex rendering of the URL's FNV-1a
/// fingerprint, so the same URL always maps to the same hash.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShortHash(String);

impl ShortHash {
    /// Computes the hash of a URL.
    ///
    /// # Examples
    ///
    /// ```
    /// use shortlink_core::ShortHash;
    ///
    /// let hash = ShortHash::of("https://example.com/page");
    /// assert_eq!(hash.as_str().len(), 8);
    /// assert_eq!(hash, ShortHash::of("https://example.com/page"));
    /// ```
    pub fn of(url: &str) -> Self {
        Self(format!("{:08x}", fnv1a32(url.as_bytes())))
    }

    /// Parses a hash received from an untrusted source.
    pub fn parse(hash: impl Into<String>) -> Result<Self, EntryError> {
        let hash = hash.into();

        if hash.len() != HASH_LENGTH {
            return Err(EntryError::InvalidHash(format!(
                "length must be {}, got {}",
                HASH_LENGTH,
                hash.len()
            )));
        }

        if !hash.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(EntryError::InvalidHash(format!(
                "must contain only alphanumeric characters: '{}'",
                hash
            )));
        }

        Ok(Self(hash))
    }

    /// Returns the hash as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ShortHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ShortHash {
    type Error = EntryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ShortHash> for String {
    fn from(value: ShortHash) -> Self {
        value.0
    }
}

/// A URL together with the hash it is stored under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortEntry {
    pub hash: ShortHash,
    pub url: String,
}

impl ShortEntry {
    /// Creates an entry keyed by the URL's own fingerprint.
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            hash: ShortHash::of(&url),
            url,
        }
    }
}

/// Checks that `url` starts with an `http` or `https` scheme followed by a
/// host made of word characters, dots, hyphens or percent escapes.
pub fn validate_url(url: &str) -> Result<(), EntryError> {
    let Some(rest) = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
    else {
        return Err(EntryError::InvalidUrl(format!(
            "'{}' must start with http:// or https://",
            url
        )));
    };

    if host_len(rest) == 0 {
        return Err(EntryError::InvalidUrl(format!(
            "'{}' has no host",
            url
        )));
    }

    Ok(())
}

fn host_len(rest: &str) -> usize {
    let bytes = rest.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'-' | b'.' | b'_' => i += 1,
            b if b.is_ascii_alphanumeric() => i += 1,
            b'%' if bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit() =>
            {
                i += 3
            }
            _ => break,
        }
    }
    i
}
