//! In-memory order store.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::OrderStore;
use crate::error::StoreError;
use crate::models::Order;

#[derive(Debug, Default)]
struct Inner {
    orders: HashMap<String, (u64, Order)>,
    next_seq: u64,
    failing: HashSet<String>,
    unavailable: bool,
}

/// Map-backed `OrderStore`.
///
/// Recency follows `date_created`, ties broken by insertion order. Failure
/// switches let callers exercise the error paths of the cache and lookup.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later `get_by_id(order_uid)` fail with a query error.
    pub async fn fail_on(&self, order_uid: &str) {
        self.inner.write().await.failing.insert(order_uid.to_string());
    }

    /// Toggles a simulated outage for all operations.
    pub async fn set_available(&self, available: bool) {
        self.inner.write().await.unavailable = !available;
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.orders.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.orders.is_empty()
    }
}

fn outage() -> StoreError {
    StoreError::Unavailable("memory store marked unavailable".to_string())
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn get_by_id(&self, order_uid: &str) -> Result<Order, StoreError> {
        let inner = self.inner.read().await;
        if inner.unavailable {
            return Err(outage());
        }
        if inner.failing.contains(order_uid) {
            return Err(StoreError::Query(format!("injected failure for {}", order_uid)));
        }
        inner
            .orders
            .get(order_uid)
            .map(|(_, order)| order.clone())
            .ok_or_else(|| StoreError::NotFound(order_uid.to_string()))
    }

    async fn save(&self, order: &Order) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if inner.unavailable {
            return Err(outage());
        }
        if inner.orders.contains_key(&order.order_uid) {
            return Err(StoreError::AlreadyExists(order.order_uid.clone()));
        }
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner
            .orders
            .insert(order.order_uid.clone(), (seq, order.clone()));
        Ok(())
    }

    async fn list_recent_ids(&self, limit: usize) -> Result<Vec<String>, StoreError> {
        let inner = self.inner.read().await;
        if inner.unavailable {
            return Err(outage());
        }
        let mut rows: Vec<(&Order, u64)> = inner
            .orders
            .values()
            .map(|(seq, order)| (order, *seq))
            .collect();
        rows.sort_by(|a, b| {
            b.0.date_created
                .cmp(&a.0.date_created)
                .then_with(|| b.1.cmp(&a.1))
        });
        Ok(rows
            .into_iter()
            .take(limit)
            .map(|(order, _)| order.order_uid.clone())
            .collect())
    }
}
