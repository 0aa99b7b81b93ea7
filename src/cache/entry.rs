//! Cache Entry Module
//!
//! Defines a cached origin response with TTL support.

use std::time::Duration;

use axum::http::{HeaderMap, StatusCode};
use bytes::Bytes;
use chrono::{DateTime, Utc};

// == Cache Entry ==
/// A cached origin response.
///
/// `created_at` and `ttl` are assigned by the store on insertion; whatever a
/// caller puts there beforehand is overwritten.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Response payload
    pub body: Bytes,
    /// Response headers, every value of multi-valued headers kept in order
    pub headers: HeaderMap,
    /// Response status
    pub status: StatusCode,
    /// Insertion time, set by the store
    pub created_at: DateTime<Utc>,
    /// Lifetime after insertion, zero = never expires
    pub ttl: Duration,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry from an origin response.
    pub fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            body,
            headers,
            status,
            created_at: Utc::now(),
            ttl: Duration::ZERO,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry has outlived its TTL at `now`.
    ///
    /// An entry is expired once `now - created_at` is strictly greater than
    /// the TTL. A zero TTL never expires, and a `now` earlier than
    /// `created_at` (clock step backwards) is treated as not expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        if self.ttl.is_zero() {
            return false;
        }
        match (now - self.created_at).to_std() {
            Ok(age) => age > self.ttl,
            Err(_) => false,
        }
    }

    /// Checks whether the entry has expired as of the current time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    // == Time To Live ==
    /// Returns the remaining lifetime, or None if the entry never expires.
    pub fn ttl_remaining(&self) -> Option<Duration> {
        if self.ttl.is_zero() {
            return None;
        }
        let age = (Utc::now() - self.created_at)
            .to_std()
            .unwrap_or(Duration::ZERO);
        Some(self.ttl.saturating_sub(age))
    }
}
