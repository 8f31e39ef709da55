//! Shared Cache Handle
//!
//! Thread-safe, cloneable front for a [`CacheStore`], adding read-through
//! helpers and the background trim timer.

use std::convert::Infallible;
use std::future::Future;
use std::panic;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::cache::{CacheStats, CacheStore};
use crate::config::Config;
use crate::error::Result;
use crate::tasks::TrimTimer;

#[derive(Debug)]
struct Shared {
    store: Arc<Mutex<CacheStore>>,
    timer: Mutex<TrimTimer>,
}

// == Cache ==
/// A TTL key-value cache.
///
/// Clones are handles to the same cache. Every operation locks the store for
/// its own duration only, so values can be read and written from any thread.
///
/// Stored values are type-erased: each call site picks the type it reads
/// back, and a value stored as another type reads as a miss. Nothing checks
/// that callers agree on the type of a key.
#[derive(Debug, Clone)]
pub struct Cache {
    shared: Arc<Shared>,
}

impl Default for Cache {
    fn default() -> Self {
        Self::new()
    }
}

impl Cache {
    // == Constructor ==
    /// Creates an empty cache with background trimming disabled.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                store: Arc::new(Mutex::new(CacheStore::new())),
                timer: Mutex::new(TrimTimer::new()),
            }),
        }
    }

    /// Creates a cache and arms its trim timer from configuration.
    ///
    /// Fails if the configured interval is invalid, or positive while no
    /// tokio runtime is running.
    pub fn from_config(config: &Config) -> Result<Self> {
        let cache = Self::new();
        cache.set_trim_interval(config.trim_interval)?;
        Ok(cache)
    }

    /// Returns a clone of the live value under `key`, if any.
    ///
    /// Expired entries are evicted as a side effect.
    pub fn read<T: Clone + 'static>(&self, key: &str) -> Option<T> {
        self.shared.store.lock().read(key)
    }

    /// Returns the live value under `key`, or `fallback` on a miss.
    pub fn read_or<T: Clone + 'static>(&self, key: &str, fallback: T) -> T {
        self.shared.store.lock().read_or(key, fallback)
    }

    /// Stores `value` under `key` for `ttl_seconds`, replacing any previous entry.
    pub fn write<T: Send + Sync + 'static>(
        &self,
        key: impl Into<String>,
        value: T,
        ttl_seconds: f64,
    ) {
        self.shared.store.lock().write(key, value, ttl_seconds);
    }

    /// Extends the lifetime of a live entry by its original TTL.
    ///
    /// Absent keys are ignored. An expired entry is evicted instead of
    /// extended, like any other access to it.
    pub fn touch(&self, key: &str) {
        self.shared.store.lock().touch(key);
    }

    // == Read-Through ==
    /// Returns the cached value for `key`, or computes it with `generator`,
    /// stores it for `ttl_seconds` and returns it.
    ///
    /// On a miss the generator's future runs on its own tokio task together
    /// with the write, so a caller that drops the returned future does not
    /// prevent the value from being stored once it is ready. Must be called
    /// from within a tokio runtime.
    ///
    /// Concurrent misses on the same key are not coalesced: each of them runs
    /// its own generator and the last write wins. The store is not locked
    /// while the generator runs.
    pub async fn through<T, F, Fut>(&self, key: &str, generator: F, ttl_seconds: f64) -> T
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let infallible = move || {
            let pending = generator();
            async move { Ok::<T, Infallible>(pending.await) }
        };
        match self.try_through(key, infallible, ttl_seconds).await {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Fallible [`Cache::through`]: a generator error is returned unchanged
    /// and nothing is stored. A panic in the generator is resumed in the caller.
    pub async fn try_through<T, E, F, Fut>(
        &self,
        key: &str,
        generator: F,
        ttl_seconds: f64,
    ) -> std::result::Result<T, E>
    where
        T: Clone + Send + Sync + 'static,
        E: Send + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>> + Send + 'static,
    {
        if let Some(value) = self.read(key) {
            return Ok(value);
        }

        debug!(key, "read-through miss, awaiting generator");
        let pending = generator();
        let cache = self.clone();
        let key = key.to_owned();
        let fill = tokio::spawn(async move {
            let value = pending.await?;
            cache.write(key, value.clone(), ttl_seconds);
            Ok(value)
        });

        match fill.await {
            Ok(result) => result,
            Err(err) if err.is_panic() => panic::resume_unwind(err.into_panic()),
            // Only reachable while the runtime itself is shutting down
            Err(err) => panic!("read-through task cancelled: {}", err),
        }
    }

    /// Synchronous [`Cache::through`]. The generator may use this cache.
    pub fn through_sync<T, F>(&self, key: &str, generator: F, ttl_seconds: f64) -> T
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> T,
    {
        match self.try_through_sync(key, || Ok::<T, Infallible>(generator()), ttl_seconds) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Synchronous [`Cache::try_through`].
    pub fn try_through_sync<T, E, F>(
        &self,
        key: &str,
        generator: F,
        ttl_seconds: f64,
    ) -> std::result::Result<T, E>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> std::result::Result<T, E>,
    {
        if let Some(value) = self.read(key) {
            return Ok(value);
        }

        debug!(key, "read-through miss, running generator");
        let value = generator()?;
        self.write(key, value.clone(), ttl_seconds);
        Ok(value)
    }

    // == Maintenance ==
    /// Removes every expired entry and returns how many were removed.
    pub fn trim(&self) -> usize {
        self.shared.store.lock().trim()
    }

    /// Removes `key` if present.
    pub fn forget(&self, key: &str) {
        self.shared.store.lock().forget(key);
    }

    /// Removes every entry regardless of expiry.
    pub fn clear(&self) {
        self.shared.store.lock().clear();
    }

    // == Introspection ==
    /// Number of stored entries, including stale ones not yet evicted.
    pub fn count(&self) -> usize {
        self.shared.store.lock().len()
    }

    /// Snapshot of stored keys, including stale ones not yet evicted.
    pub fn keys(&self) -> Vec<String> {
        self.shared.store.lock().keys()
    }

    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.shared.store.lock().stats()
    }

    // == Trim Interval ==
    /// Background trim interval in seconds, 0 when disabled.
    pub fn trim_interval(&self) -> f64 {
        self.shared.timer.lock().interval_secs()
    }

    /// Sets the background trim interval.
    ///
    /// `0` stops background trimming. A positive value replaces any running
    /// trim task with one that trims every `secs` seconds on the current tokio
    /// runtime. Set the interval back to `0` before shutting down to release
    /// the task; dropping the last handle to the cache also stops it.
    pub fn set_trim_interval(&self, secs: f64) -> Result<()> {
        self.shared
            .timer
            .lock()
            .set_interval(&self.shared.store, secs)
    }
}
