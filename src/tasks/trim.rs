//! Background Trim Task
//!
//! Recurring task that removes expired cache entries, and the timer that
//! owns it.

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::cache::CacheStore;
use crate::error::{CacheError, Result};

/// Spawns a task on `runtime` that trims `store` every `period`.
///
/// The task holds only a weak reference and exits on the first tick after
/// the store has been dropped. Ticks missed under load are delayed rather
/// than replayed in a burst.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort it.
pub fn spawn_trim_task(
    runtime: &Handle,
    store: Weak<Mutex<CacheStore>>,
    period: Duration,
) -> JoinHandle<()> {
    runtime.spawn(async move {
        info!(period_ms = period.as_millis() as u64, "Starting cache trim task");

        let Some(first_tick) = Instant::now().checked_add(period) else {
            warn!("Trim period out of range, trim task not started");
            return;
        };
        let mut ticker = time::interval_at(first_tick, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let Some(store) = store.upgrade() else {
                debug!("Cache dropped, stopping trim task");
                break;
            };
            let removed = store.lock().trim();

            if removed > 0 {
                info!("Cache trim: removed {} expired entries", removed);
            } else {
                debug!("Cache trim: no expired entries found");
            }
        }
    })
}

// == Trim Timer ==
/// Owns the background trim task of one cache.
///
/// An interval of 0 means disarmed. The running task is a live resource:
/// set the interval back to 0 for a clean shutdown. Dropping the timer also
/// aborts the task.
#[derive(Debug, Default)]
pub struct TrimTimer {
    interval_secs: f64,
    handle: Option<JoinHandle<()>>,
}

impl TrimTimer {
    /// Creates a disarmed timer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the configured interval in seconds (0 when disarmed).
    pub fn interval_secs(&self) -> f64 {
        self.interval_secs
    }

    /// Returns true while a trim task is running.
    pub fn is_armed(&self) -> bool {
        self.handle.is_some()
    }

    /// Re-arms the timer to trim `store` every `secs` seconds.
    ///
    /// Any running task is stopped first. `0` only disarms. Negative,
    /// non-finite, sub-nanosecond or unrepresentably long intervals are
    /// rejected, as is arming outside a tokio runtime; on error the current
    /// timer is left as it was.
    pub fn set_interval(&mut self, store: &Arc<Mutex<CacheStore>>, secs: f64) -> Result<()> {
        if secs == 0.0 {
            self.disarm();
            return Ok(());
        }

        let period = Duration::try_from_secs_f64(secs)
            .ok()
            .filter(|period| !period.is_zero())
            .filter(|period| Instant::now().checked_add(*period).is_some())
            .ok_or_else(|| {
                warn!(secs, "Rejected trim interval");
                CacheError::InvalidInterval(secs)
            })?;
        let runtime = Handle::try_current().map_err(|_| CacheError::NoRuntime)?;

        self.disarm();
        self.handle = Some(spawn_trim_task(&runtime, Arc::downgrade(store), period));
        self.interval_secs = secs;
        info!(interval_secs = secs, "Cache trim timer armed");
        Ok(())
    }

    /// Stops the running task, if any.
    pub fn disarm(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            info!("Cache trim timer disarmed");
        }
        self.interval_secs = 0.0;
    }
}

impl Drop for TrimTimer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
