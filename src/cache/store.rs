//! Cache Store Module
//!
//! Single-owner cache engine: HashMap storage with lazy TTL eviction.
//! Thread-safe access and read-through helpers live on [`crate::cache::Cache`].

use std::collections::HashMap;

use chrono::Utc;
use tracing::{debug, trace};

use crate::cache::{CacheEntry, CacheStats};

// == Cache Store ==
/// Key-value storage with per-entry TTL.
///
/// Expired entries stay in the map until they are accessed, trimmed,
/// forgotten or cleared.
#[derive(Debug, Default)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Performance statistics
    stats: CacheStats,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty CacheStore.
    pub fn new() -> Self {
        Self::default()
    }

    // == Read ==
    /// Retrieves a clone of the value stored under `key`.
    ///
    /// Returns `None` if the key is absent, expired, or holds a value of a
    /// different type. An expired entry is removed before returning.
    pub fn read<T: Clone + 'static>(&mut self, key: &str) -> Option<T> {
        let value = self
            .live_entry(key)
            .map(|entry| entry.value::<T>().cloned());

        match value {
            Some(Some(value)) => {
                self.stats.record_hit();
                Some(value)
            }
            Some(None) => {
                debug!(key, "cached value has a different type, treating as miss");
                self.stats.record_miss();
                None
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Like [`CacheStore::read`], returning `fallback` on a miss.
    pub fn read_or<T: Clone + 'static>(&mut self, key: &str, fallback: T) -> T {
        self.read(key).unwrap_or(fallback)
    }

    // == Write ==
    /// Stores `value` under `key` for `ttl_seconds`.
    ///
    /// Any existing entry is replaced, including its touch extensions.
    pub fn write<T: Send + Sync + 'static>(
        &mut self,
        key: impl Into<String>,
        value: T,
        ttl_seconds: f64,
    ) {
        let key = key.into();
        trace!(key = %key, ttl_seconds, "write");
        self.entries.insert(key, CacheEntry::new(value, ttl_seconds));
    }

    // == Touch ==
    /// Extends the lifetime of a live entry by its own TTL, from now.
    ///
    /// Absent keys are ignored; expired entries are evicted instead.
    pub fn touch(&mut self, key: &str) {
        if let Some(entry) = self.live_entry(key) {
            entry.extend_lifetime();
        }
    }

    // == Forget ==
    /// Removes an entry by key. Missing keys are ignored.
    pub fn forget(&mut self, key: &str) {
        self.entries.remove(key);
    }

    // == Clear ==
    /// Drops every entry regardless of expiry. Statistics counters are kept.
    pub fn clear(&mut self) {
        self.entries = HashMap::new();
    }

    // == Trim ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn trim(&mut self) -> usize {
        let now = Utc::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));

        let removed = before - self.entries.len();
        self.stats.record_expirations(removed);
        removed
    }

    // == Length ==
    /// Returns the number of stored entries, including not yet evicted stale ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Keys ==
    /// Returns a snapshot of all stored keys, including not yet evicted stale ones.
    pub fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    /// Looks up `key`, evicting it first if it has expired.
    fn live_entry(&mut self, key: &str) -> Option<&mut CacheEntry> {
        let expired = self.entries.get(key)?.is_expired(Utc::now());
        if expired {
            debug!(key, "evicting expired entry on access");
            self.entries.remove(key);
            self.stats.record_expirations(1);
            return None;
        }
        self.entries.get_mut(key)
    }
}
