//! Staleness Sweep Task
//!
//! Background task that periodically evicts stale chunks.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::ChunkCache;

/// Spawns a background task that periodically sweeps the cache.
///
/// The task runs in an infinite loop, sleeping for the given interval
/// between sweeps. Which entries go depends on the cache's `SweepPolicy`;
/// under the default policy each sweep clears every chunk written before it.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during shutdown.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(ChunkCache::new());
/// let sweep_handle = spawn_sweep_task(cache.clone(), 1);
/// // Later, during shutdown:
/// sweep_handle.abort();
/// ```
pub fn spawn_sweep_task(cache: Arc<ChunkCache>, sweep_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(sweep_interval_secs);

    tokio::spawn(async move {
        info!(
            policy = ?cache.sweep_policy(),
            "Starting sweep task with interval of {} seconds", sweep_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.sweep();

            if removed > 0 {
                info!("Sweep: removed {} stale chunks", removed);
            } else {
                debug!("Sweep: no stale chunks found");
            }
        }
    })
}
