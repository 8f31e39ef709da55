//! Cache Module
//!
//! Provides in-memory caching with TTL expiration, lazy eviction and
//! read-through helpers.

mod entry;
mod global;
mod shared;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::{CacheEntry, Value};
pub use global::global;
pub use shared::Cache;
pub use stats::CacheStats;
pub use store::CacheStore;
