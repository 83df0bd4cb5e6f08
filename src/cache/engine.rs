//! Cache Engine Module
//!
//! Thread-safe order cache: one mutex over the LRU core and its counters.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::cache::lru::{LruCore, PutOutcome};
use crate::cache::CacheStats;
use crate::models::Order;
use crate::storage::OrderStore;
use crate::tasks::spawn_preload_task;

#[derive(Debug)]
struct Inner {
    lru: LruCore<Arc<Order>>,
    stats: CacheStats,
}

// == Cache Engine ==
/// Bounded LRU cache of orders keyed by `order_uid`.
///
/// `get` and `put` each hold the lock for their whole body and never perform
/// I/O, so they are linearizable with respect to each other. The engine never
/// reads the store on a miss; callers fetch and `put` themselves.
#[derive(Debug)]
pub struct CacheEngine {
    inner: Mutex<Inner>,
    capacity: NonZeroUsize,
}

impl CacheEngine {
    // == Constructors ==
    /// Creates the engine and starts warming it from `store` in the
    /// background. Returns immediately; the cache is usable while cold.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(capacity: NonZeroUsize, store: Arc<dyn OrderStore>) -> Arc<Self> {
        let engine = Arc::new(Self::cold(capacity));
        // Preload reports through logs only.
        let _preload = spawn_preload_task(Arc::clone(&engine), store);
        engine
    }

    /// Creates an empty engine without preloading.
    pub fn cold(capacity: NonZeroUsize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                lru: LruCore::new(capacity),
                stats: CacheStats::for_capacity(capacity.get()),
            }),
            capacity,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Critical sections cannot leave the core half-updated, so a poisoned
        // lock still guards a consistent structure.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // == Get ==
    /// Returns the cached order and marks it most recently used.
    ///
    /// A miss returns `None` and leaves the recency order unchanged.
    pub fn get(&self, order_uid: &str) -> Option<Arc<Order>> {
        let mut inner = self.lock();
        let hit = inner.lru.get(order_uid).cloned();
        inner.stats.record_lookup(hit.is_some());
        hit
    }

    // == Put ==
    /// Stores `order` under `order_uid`, overwriting any cached value.
    ///
    /// Inserting into a full cache evicts the least recently used entry in
    /// the same critical section.
    pub fn put(&self, order_uid: impl Into<String>, order: impl Into<Arc<Order>>) {
        let order_uid = order_uid.into();
        let mut inner = self.lock();

        let outcome = inner.lru.put(order_uid.clone(), order.into());
        inner.stats.record_put(&outcome);

        match outcome {
            PutOutcome::Updated => {
                debug!(order_uid = %order_uid, "Updated existing key in cache");
            }
            PutOutcome::Inserted { evicted } => {
                if let Some(evicted) = evicted {
                    debug!(order_uid = %evicted, "Evicted least recently used key");
                }
                debug!(
                    order_uid = %order_uid,
                    cache_size = inner.lru.len(),
                    "Added new key to cache"
                );
            }
        }
    }

    // == Introspection ==
    pub fn len(&self) -> usize {
        self.lock().lru.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().lru.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Returns true if `order_uid` is cached, without promoting it.
    pub fn contains(&self, order_uid: &str) -> bool {
        self.lock().lru.contains(order_uid)
    }

    /// Cached keys from most to least recently used.
    pub fn keys_by_recency(&self) -> Vec<String> {
        self.lock().lru.keys_by_recency()
    }

    /// Checks that the index and recency list describe the same key set.
    pub fn is_consistent(&self) -> bool {
        self.lock().lru.is_consistent()
    }

    /// Counter snapshot.
    pub fn stats(&self) -> CacheStats {
        let inner = self.lock();
        CacheStats {
            total_entries: inner.lru.len(),
            ..inner.stats.clone()
        }
    }
}
