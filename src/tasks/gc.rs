//! Memory Cache GC Task
//!
//! Process-wide registry of live memory caches and the background task
//! that periodically sweeps their expired entries.

use std::sync::{Mutex, MutexGuard, Weak};
use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// The default sweep interval used when the scheduler is auto-started.
pub const GC_INTERVAL: Duration = Duration::from_secs(30);

// == Sweepable ==
/// A cache whose expired entries can be swept in the background.
#[async_trait]
pub(crate) trait Sweepable: Send + Sync {
    /// Removes expired entries, returning how many were removed.
    async fn sweep(&self) -> usize;
}

// == GC Registry ==
// Weak membership: an entry never keeps its cache alive, and a cache whose
// last strong reference is dropped simply disappears from future sweeps.
static REGISTRY: Lazy<Mutex<Vec<Weak<dyn Sweepable>>>> = Lazy::new(|| Mutex::new(Vec::new()));

static SCHEDULER: Mutex<Option<JoinHandle<()>>> = Mutex::new(None);

fn registry() -> MutexGuard<'static, Vec<Weak<dyn Sweepable>>> {
    REGISTRY.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn scheduler() -> MutexGuard<'static, Option<JoinHandle<()>>> {
    SCHEDULER.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Registers a cache for background sweeping.
pub(crate) fn register(cache: Weak<dyn Sweepable>) {
    registry().push(cache);
}

// == Sweep ==
/// Sweeps every live registered cache once, pruning registrations whose
/// caches have been dropped. Returns the total number of entries removed.
pub async fn sweep_all() -> usize {
    // Take strong references outside the lock so sweeping never holds it.
    let live: Vec<_> = {
        let mut handles = registry();
        handles.retain(|weak| weak.strong_count() > 0);
        handles.iter().filter_map(Weak::upgrade).collect()
    };

    let mut removed = 0;
    for cache in live {
        removed += cache.sweep().await;
    }
    removed
}

// == Scheduler ==
/// Starts the process-wide sweep loop. At most one loop runs at a time:
/// the first call wins and later calls return false, as does a call made
/// outside a tokio runtime.
pub fn start(interval: Duration) -> bool {
    let mut slot = scheduler();
    if slot.is_some() {
        return false;
    }

    let Ok(handle) = tokio::runtime::Handle::try_current() else {
        debug!("no tokio runtime available, gc sweep loop not started");
        return false;
    };

    info!(
        "starting memory cache gc task with interval of {:?}",
        interval
    );

    *slot = Some(handle.spawn(async move {
        loop {
            tokio::time::sleep(interval).await;

            let removed = sweep_all().await;
            if removed > 0 {
                info!("gc sweep removed {} expired entries", removed);
            } else {
                debug!("gc sweep found no expired entries");
            }
        }
    }));

    true
}

/// Stops the sweep loop. Idempotent; a later [`start`] may run a new one.
pub fn shutdown() {
    if let Some(handle) = scheduler().take() {
        handle.abort();
    }
}
