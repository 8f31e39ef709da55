//! Background Tasks Module
//!
//! Contains background tasks that run periodically alongside a cache.
//!
//! # Tasks
//! - Trim: Removes expired cache entries at a configured interval

mod trim;

pub use trim::{spawn_trim_task, TrimTimer};
