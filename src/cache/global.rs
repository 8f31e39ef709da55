//! Process-wide default cache.

use once_cell::sync::Lazy;

use crate::cache::Cache;

static GLOBAL: Lazy<Cache> = Lazy::new(Cache::new);

/// Returns the process-wide default cache.
///
/// It is created empty, with trimming disabled, on first use and is never
/// torn down. It is an ordinary [`Cache`]: if you arm its trim timer, set the
/// interval back to 0 before the runtime that owns the task shuts down.
pub fn global() -> &'static Cache {
    &GLOBAL
}
