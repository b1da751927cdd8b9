//! HTTP cache control module
//!
//! Provides content hashing, per-process `ETag` validators and conditional
//! request handling.

use chrono::{DateTime, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Hex encoded SHA-256 digest of `data`
pub fn hash_data(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}

/// Format a timestamp as an HTTP-date (RFC 7231 IMF-fixdate)
pub fn http_date(time: DateTime<Utc>) -> String {
    time.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Validators shared by every response of one server instance
///
/// `Last-Modified` is fixed at construction. `ETag`s are prefixed with a
/// hash of that timestamp plus a random salt, so they are stable while the
/// process runs and never match a tag issued by an earlier process.
#[derive(Debug, Clone)]
pub struct CacheValidators {
    last_modified: String,
    etag_prefix: String,
}

impl CacheValidators {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        let mut salt = [0u8; 4];
        rand::thread_rng().fill_bytes(&mut salt);
        Self::with_salt(started_at, salt)
    }

    pub fn with_salt(started_at: DateTime<Utc>, salt: [u8; 4]) -> Self {
        let last_modified = http_date(started_at);
        let salt_hex: String = salt.iter().map(|b| format!("{b:02x}")).collect();
        let etag_prefix = format!("{}-{salt_hex}-", hash_data(last_modified.as_bytes()));

        Self {
            last_modified,
            etag_prefix,
        }
    }

    pub fn last_modified(&self) -> &str {
        &self.last_modified
    }

    /// Quoted `ETag` for content with the given hash
    pub fn etag(&self, hash: &str) -> String {
        format!("\"{}{hash}\"", self.etag_prefix)
    }
}

/// Check if client's `If-None-Match` header matches the server's `ETag`
///
/// Supports:
/// - Single `ETag`: `"abc123"`
/// - Multiple `ETags`: `"abc123", "def456"`
/// - Weak validators: `W/"abc123"`
/// - Wildcard: `*`
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client_etag| {
        client_etag.split(',').map(str::trim).any(|e| {
            e == "*" || e.strip_prefix("W/").unwrap_or(e) == etag
        })
    })
}
