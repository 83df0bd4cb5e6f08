//! Storage Module
//!
//! The durable order store consumed by the cache, the lookup path and the
//! ingestion writer.
//!
//! # Implementations
//! - `PgStore`: PostgreSQL via a deadpool connection pool
//! - `MemoryStore`: process-local map, for tests and database-less runs

mod memory;
mod postgres;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::Order;

pub use memory::MemoryStore;
pub use postgres::{PgConfig, PgStore};

/// Durable store of complete orders.
///
/// Implementations must be safe to share across tasks. `save` is atomic over
/// the whole aggregate: a reader never sees a header without its delivery,
/// payment and items.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Loads the full order. Absent identifiers yield `StoreError::NotFound`.
    async fn get_by_id(&self, order_uid: &str) -> Result<Order, StoreError>;

    /// Persists a new order in a single transaction.
    async fn save(&self, order: &Order) -> Result<(), StoreError>;

    /// Up to `limit` identifiers, newest `date_created` first.
    async fn list_recent_ids(&self, limit: usize) -> Result<Vec<String>, StoreError>;
}
