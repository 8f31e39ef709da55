//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::any::Any;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

/// Type-erased payload stored in a cache entry.
pub type Value = Arc<dyn Any + Send + Sync>;

// == Cache Entry ==
/// Represents a single cache entry with its value and expiry bookkeeping.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored value
    value: Value,
    /// Lifetime in seconds, applied on creation and on every touch
    ttl_seconds: f64,
    /// Instant after which the entry is stale
    expires_at: DateTime<Utc>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry that expires `ttl_seconds` from now.
    ///
    /// A TTL of zero or less produces an entry that is already (or about to be)
    /// expired.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ttl_seconds` - Lifetime in seconds, fractions allowed
    pub fn new<T: Send + Sync + 'static>(value: T, ttl_seconds: f64) -> Self {
        Self {
            value: Arc::new(value),
            ttl_seconds,
            expires_at: deadline(Utc::now(), ttl_seconds),
        }
    }

    // == Extend Lifetime ==
    /// Pushes the expiry out to `now + ttl_seconds`, reusing the original TTL.
    pub fn extend_lifetime(&mut self) {
        self.expires_at = deadline(Utc::now(), self.ttl_seconds);
    }

    // == Is Expired ==
    /// Checks if the entry is stale at `now`.
    ///
    /// An entry is still live at exactly its expiry instant and expired only
    /// strictly after it.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    /// Returns the payload as a `T`, or `None` if it was stored as another type.
    pub fn value<T: 'static>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Returns the TTL this entry was written with.
    pub fn ttl_seconds(&self) -> f64 {
        self.ttl_seconds
    }

    /// Returns the absolute expiry instant.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

// == Utility Functions ==
/// Computes `from + ttl_seconds`, clamping to the representable time range.
///
/// Out of range and infinite TTLs saturate; NaN is treated as zero.
fn deadline(from: DateTime<Utc>, ttl_seconds: f64) -> DateTime<Utc> {
    let micros = (ttl_seconds * 1_000_000.0) as i64;
    from.checked_add_signed(Duration::microseconds(micros))
        .unwrap_or(if micros < 0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        })
}
