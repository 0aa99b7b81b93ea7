//! TTL Cleanup Task
//!
//! Background task that periodically sweeps expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Spawns a background task that periodically removes expired entries.
///
/// The sweep runs every `interval`, independent of any entry's TTL, and
/// competes for the store's write lock like any other writer. The task exits
/// when `cancel` is triggered; await the returned handle to confirm it has
/// stopped.
///
/// # Example
/// ```ignore
/// let store = Arc::new(CacheStore::new(1000, 1024 * 1024));
/// let cancel = CancellationToken::new();
/// let handle = spawn_cleanup_task(store.clone(), Duration::from_secs(60), cancel.clone());
/// // Later, during shutdown:
/// cancel.cancel();
/// handle.await?;
/// ```
pub fn spawn_cleanup_task(
    store: Arc<CacheStore>,
    interval: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(interval_ms = interval.as_millis() as u64, "Starting TTL cleanup task");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("TTL cleanup task stopping");
                    break;
                }
                _ = tokio::time::sleep(interval) => {}
            }

            let removed = store.cleanup_expired();

            if removed > 0 {
                info!(removed, "TTL cleanup: removed expired entries");
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}
