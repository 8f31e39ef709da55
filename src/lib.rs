//! Mini TTL Cache - An in-process key-value cache with per-entry expiry
//!
//! Values are evicted lazily when read after their TTL, or proactively by an
//! optional background trim task. Read-through helpers wrap expensive
//! computations so repeated calls within the TTL reuse the stored result.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{global, Cache, CacheStats};
pub use config::Config;
pub use error::{CacheError, Result};
