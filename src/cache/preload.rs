//! Cache Preload Module
//!
//! Warms the cache with the most recent orders from the store.

use tracing::{error, info};

use crate::cache::CacheEngine;
use crate::storage::OrderStore;

/// Counts from one preload pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreloadReport {
    /// Identifiers returned by the store
    pub listed: usize,
    /// Orders fetched and cached
    pub loaded: usize,
    /// Orders that failed to fetch and were skipped
    pub failed: usize,
}

/// Loads up to `capacity` recent orders into `engine`.
///
/// Identifiers are processed in store order, newest first, one at a time.
/// Each fetch happens without the engine lock; only the final `put` takes it.
/// A failed fetch is logged and skipped, and a failed listing ends the pass.
pub async fn preload(engine: &CacheEngine, store: &dyn OrderStore) -> PreloadReport {
    let ids = match store.list_recent_ids(engine.capacity()).await {
        Ok(ids) => ids,
        Err(err) => {
            error!(error = %err, "Cache preload failed to list order ids");
            return PreloadReport::default();
        }
    };

    let mut report = PreloadReport {
        listed: ids.len(),
        ..PreloadReport::default()
    };

    for order_uid in ids {
        match store.get_by_id(&order_uid).await {
            Ok(order) => {
                engine.put(order_uid, order);
                report.loaded += 1;
            }
            Err(err) => {
                error!(order_uid = %order_uid, error = %err, "Error loading order for cache");
                report.failed += 1;
            }
        }
    }

    info!(
        items_loaded = report.loaded,
        items_failed = report.failed,
        "Cache preloaded"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::demo_order;
    use crate::storage::MemoryStore;
    use chrono::{Duration, Utc};
    use std::num::NonZeroUsize;

    async fn store_with(ids: &[&str]) -> MemoryStore {
        // First id is the newest.
        let store = MemoryStore::new();
        let now = Utc::now();
        for (age, uid) in ids.iter().enumerate() {
            let created = now - Duration::minutes(age as i64);
            store.save(&demo_order(uid, created)).await.unwrap();
        }
        store
    }

    fn engine(capacity: usize) -> CacheEngine {
        CacheEngine::cold(NonZeroUsize::new(capacity).unwrap())
    }

    #[tokio::test]
    async fn test_preload_keeps_most_recent() {
        let store = store_with(&["x", "y", "z"]).await;
        let cache = engine(2);

        let report = preload(&cache, &store).await;

        assert_eq!(report.loaded, 2);
        assert!(cache.get("x").is_some());
        assert!(cache.get("y").is_some());
        assert!(cache.get("z").is_none());
    }

    #[tokio::test]
    async fn test_preload_processes_newest_first() {
        let store = store_with(&["x", "y", "z"]).await;
        let cache = engine(3);

        preload(&cache, &store).await;

        // Each put promotes, so the last loaded (oldest) sits at the head.
        assert_eq!(cache.keys_by_recency(), vec!["z", "y", "x"]);
    }

    #[tokio::test]
    async fn test_preload_skips_failed_item() {
        let store = store_with(&["x", "y", "z"]).await;
        store.fail_on("y").await;
        let cache = engine(3);

        let report = preload(&cache, &store).await;

        assert_eq!(
            report,
            PreloadReport {
                listed: 3,
                loaded: 2,
                failed: 1
            }
        );
        assert!(cache.contains("x"));
        assert!(!cache.contains("y"));
        assert!(cache.contains("z"));
    }

    #[tokio::test]
    async fn test_preload_store_unavailable() {
        let store = store_with(&["x"]).await;
        store.set_available(false).await;
        let cache = engine(3);

        let report = preload(&cache, &store).await;

        assert_eq!(report, PreloadReport::default());
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_preload_empty_store() {
        let store = MemoryStore::new();
        let cache = engine(3);

        let report = preload(&cache, &store).await;
        assert_eq!(report.listed, 0);
        assert!(cache.is_empty());
    }
}
