//! Cache Preload Task
//!
//! Runs one preload pass on its own task so engine construction never waits
//! on the store.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::info;

use crate::cache::{preload, CacheEngine};
use crate::storage::OrderStore;

/// Spawns a background preload of `engine` from `store`.
///
/// The task reports through logs only. The returned handle may be dropped;
/// the task keeps running detached.
pub fn spawn_preload_task(engine: Arc<CacheEngine>, store: Arc<dyn OrderStore>) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(capacity = engine.capacity(), "Starting cache preload");
        preload(&engine, store.as_ref()).await;
    })
}
