//! Content fingerprinting for cache keys.
//!
//! The fingerprint must be identical for identical bytes across process
//! restarts and across concurrent instances, so it is a fixed SHA-256
//! digest of the raw document bytes, never a per-process hash.

use sha2::{Digest, Sha256};

/// Key space prefix for content-addressed cache entries.
pub const CACHE_KEY_PREFIX: &str = "pdf_table:";

/// Hex-encoded SHA-256 digest of the document bytes.
pub fn fingerprint(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Cache key for a document: the fingerprint under [`CACHE_KEY_PREFIX`].
pub fn cache_key(bytes: &[u8]) -> String {
    format!("{}{}", CACHE_KEY_PREFIX, fingerprint(bytes))
}
