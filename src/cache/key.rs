//! Cache Key Module
//!
//! Derives deterministic cache keys from the request line.

use sha2::{Digest, Sha256};

/// Length of a generated key in hex characters.
pub const KEY_LENGTH: usize = 64;

// == Generate Key ==
/// Derives a cache key from method, path and query string.
///
/// The three fields are joined with `:` and hashed with SHA-256, rendered as
/// lowercase hex. Inputs are taken verbatim; no case or whitespace
/// normalization happens here.
pub fn generate_key(method: &str, path: &str, query: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(method.as_bytes());
    hasher.update(b":");
    hasher.update(path.as_bytes());
    hasher.update(b":");
    hasher.update(query.as_bytes());
    hex::encode(hasher.finalize())
}
