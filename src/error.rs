//! Error types for the cache
//!
//! Data operations never fail: a miss is a normal outcome. Only trim timer
//! configuration and environment parsing can produce a `CacheError`.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CacheError {
    /// Trim interval is negative, not finite, or rounds down to zero
    #[error("Invalid trim interval: {0} seconds")]
    InvalidInterval(f64),

    /// A background task was requested outside of a tokio runtime
    #[error("No tokio runtime available to run the trim timer")]
    NoRuntime,

    /// An environment variable could not be parsed
    #[error("Invalid value for {var}: {value:?}")]
    InvalidConfig { var: &'static str, value: String },
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
