//! Cache Module
//!
//! Provides the response cache: key derivation, TTL-aware entries, the
//! concurrent in-memory store and its statistics.

mod entry;
mod key;
mod stats;
mod store;


use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;

// Re-export public types
pub use entry::CacheEntry;
pub use key::{generate_key, KEY_LENGTH};
pub use stats::CacheStats;
pub use store::CacheStore;

// == Cache Capability ==
/// Storage contract the dispatcher and admin surface depend on.
///
/// `CacheStore` is the in-process implementation; an out-of-process backend
/// can implement the same trait without touching its callers.
pub trait Cache: Send + Sync {
    /// Returns a read-only view of a live entry. Expired entries are removed
    /// and reported as a miss.
    fn get(&self, key: &str) -> Option<Arc<CacheEntry>>;

    /// Inserts or overwrites an entry, stamping its creation time and TTL.
    fn set(&self, key: &str, entry: CacheEntry, ttl: Duration) -> Result<()>;

    /// Removes a key, returning whether it was present.
    fn delete(&self, key: &str) -> bool;

    /// Empties the store. Lifetime counters are kept.
    fn clear(&self);

    /// Returns a point-in-time statistics snapshot.
    fn stats(&self) -> CacheStats;

    /// Returns the current entry count.
    fn size(&self) -> usize;
}
