//! Cache Store Module
//!
//! In-memory cache engine: a HashMap behind a reader/writer lock with TTL
//! expiration, oldest-first size eviction and lifetime statistics.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::debug;

use crate::cache::stats::StatsCounters;
use crate::cache::{Cache, CacheEntry, CacheStats};
use crate::config::CacheConfig;
use crate::error::{ProxyError, Result};

/// A stored entry plus its insertion sequence number.
///
/// The sequence breaks ties between entries stamped with the same
/// `created_at` so eviction always has a single oldest candidate.
#[derive(Debug)]
struct Slot {
    entry: Arc<CacheEntry>,
    seq: u64,
}

#[derive(Debug)]
struct Inner {
    entries: HashMap<String, Slot>,
    next_seq: u64,
    last_cleared: DateTime<Utc>,
}

// == Cache Store ==
/// Concurrent response store with TTL expiry and bounded size.
#[derive(Debug)]
pub struct CacheStore {
    /// Entries and clear timestamp, guarded together
    inner: RwLock<Inner>,
    /// Lifetime counters
    counters: StatsCounters,
    /// Maximum number of entries allowed
    max_size: usize,
    /// Largest body accepted by `set`
    max_entry_bytes: usize,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore.
    ///
    /// # Arguments
    /// * `max_size` - Maximum number of entries the store can hold
    /// * `max_entry_bytes` - Largest response body the store accepts
    pub fn new(max_size: usize, max_entry_bytes: usize) -> Self {
        Self {
            inner: RwLock::new(Inner {
                entries: HashMap::new(),
                next_seq: 0,
                last_cleared: Utc::now(),
            }),
            counters: StatsCounters::default(),
            max_size: max_size.max(1),
            max_entry_bytes,
        }
    }

    /// Creates a CacheStore from the cache section of the configuration.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.max_size, config.max_entry_bytes)
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    // == Cleanup Expired ==
    /// Removes every entry whose TTL has elapsed.
    ///
    /// Counts one eviction per removed entry and returns the number removed.
    pub fn cleanup_expired(&self) -> usize {
        let now = Utc::now();
        let mut inner = self.inner.write();

        let before = inner.entries.len();
        inner
            .entries
            .retain(|_, slot| !slot.entry.is_expired_at(now));
        let removed = before - inner.entries.len();

        self.counters.record_evictions(removed as u64);
        removed
    }

    /// Removes the entry with the oldest `created_at`.
    ///
    /// Linear scan; caller holds the write lock.
    fn evict_oldest(&self, inner: &mut Inner) {
        let oldest = inner
            .entries
            .iter()
            .min_by_key(|(_, slot)| (slot.entry.created_at, slot.seq))
            .map(|(key, _)| key.clone());

        if let Some(key) = oldest {
            inner.entries.remove(&key);
            self.counters.record_evictions(1);
            debug!(cache_key = %key, "Evicted oldest entry");
        }
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.inner.read().entries.is_empty()
    }
}

impl Cache for CacheStore {
    // == Get ==
    /// Looks up a key under the shared lock.
    ///
    /// An expired entry is removed under the exclusive lock and reported as
    /// a miss plus an eviction. The entry is re-checked after the lock
    /// switch so a concurrent `set` that refreshed the key is served.
    fn get(&self, key: &str) -> Option<Arc<CacheEntry>> {
        {
            let inner = self.inner.read();
            match inner.entries.get(key) {
                None => {
                    self.counters.record_miss();
                    return None;
                }
                Some(slot) if !slot.entry.is_expired_at(Utc::now()) => {
                    self.counters.record_hit();
                    return Some(Arc::clone(&slot.entry));
                }
                Some(_) => {}
            }
        }

        let mut inner = self.inner.write();
        let expired = inner
            .entries
            .get(key)
            .map(|slot| slot.entry.is_expired_at(Utc::now()));
        let live = match expired {
            Some(false) => inner.entries.get(key).map(|slot| Arc::clone(&slot.entry)),
            Some(true) => {
                inner.entries.remove(key);
                self.counters.record_evictions(1);
                None
            }
            // Swept between the lock switch; the sweep counted the eviction
            None => None,
        };

        match live {
            Some(entry) => {
                self.counters.record_hit();
                Some(entry)
            }
            None => {
                self.counters.record_miss();
                None
            }
        }
    }

    // == Set ==
    /// Stores an entry, overwriting any previous value for the key.
    ///
    /// When the store is full, exactly one entry (the oldest by `created_at`)
    /// is evicted first, even if `key` is already present.
    fn set(&self, key: &str, mut entry: CacheEntry, ttl: Duration) -> Result<()> {
        if entry.body.len() > self.max_entry_bytes {
            return Err(ProxyError::internal(
                "CACHE_ENTRY_TOO_LARGE",
                format!(
                    "Entry body of {} bytes exceeds maximum of {} bytes",
                    entry.body.len(),
                    self.max_entry_bytes
                ),
            ));
        }

        let mut inner = self.inner.write();

        if inner.entries.len() >= self.max_size {
            self.evict_oldest(&mut inner);
        }

        entry.created_at = Utc::now();
        entry.ttl = ttl;

        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.entries.insert(
            key.to_string(),
            Slot {
                entry: Arc::new(entry),
                seq,
            },
        );

        Ok(())
    }

    // == Delete ==
    fn delete(&self, key: &str) -> bool {
        self.inner.write().entries.remove(key).is_some()
    }

    // == Clear ==
    fn clear(&self) {
        let mut inner = self.inner.write();
        inner.entries.clear();
        inner.last_cleared = Utc::now();
    }

    // == Stats ==
    fn stats(&self) -> CacheStats {
        let inner = self.inner.read();
        self.counters
            .snapshot(inner.entries.len(), inner.last_cleared)
    }

    // == Size ==
    fn size(&self) -> usize {
        self.inner.read().entries.len()
    }
}
