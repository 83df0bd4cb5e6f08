//! Order Lookup
//!
//! Cache-first read with a store fallback that populates the cache.

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::cache::CacheEngine;
use crate::error::{ApiError, StoreError};
use crate::models::Order;
use crate::storage::OrderStore;

/// Finds an order by id.
///
/// Hits are served from the cache. On a miss the store is read without any
/// cache lock held, and a found order is put into the cache before returning.
/// Store errors other than not-found surface as `ApiError::Internal`.
pub async fn lookup_order(
    cache: &CacheEngine,
    store: &dyn OrderStore,
    order_uid: &str,
) -> Result<Arc<Order>, ApiError> {
    if let Some(order) = cache.get(order_uid) {
        debug!(order_uid, "order found in cache");
        return Ok(order);
    }

    debug!(order_uid, "order not found in cache, querying database");

    match store.get_by_id(order_uid).await {
        Ok(order) => {
            let order = Arc::new(order);
            cache.put(order_uid, Arc::clone(&order));
            info!(order_uid, "order added to cache");
            Ok(order)
        }
        Err(StoreError::NotFound(_)) => {
            debug!(order_uid, "order not found in database");
            Err(ApiError::NotFound)
        }
        Err(err) => {
            error!(order_uid, error = %err, "failed to get order from database");
            Err(ApiError::Internal)
        }
    }
}
