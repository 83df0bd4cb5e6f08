//! API Handlers
//!
//! HTTP request handlers for each endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use super::lookup::lookup_order;
use crate::cache::CacheEngine;
use crate::error::{ApiError, Result};
use crate::models::{HealthResponse, OrderResponse, StatsResponse};
use crate::storage::OrderStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Shared order cache
    pub cache: Arc<CacheEngine>,
    /// Durable store for cache misses
    pub store: Arc<dyn OrderStore>,
}

impl AppState {
    pub fn new(cache: Arc<CacheEngine>, store: Arc<dyn OrderStore>) -> Self {
        Self { cache, store }
    }
}

/// Handler for GET /order/:order_uid
pub async fn get_order_handler(
    State(state): State<AppState>,
    Path(order_uid): Path<String>,
) -> Result<Json<OrderResponse>> {
    let order_uid = order_uid.trim();
    if order_uid.is_empty() {
        return Err(ApiError::InvalidRequest("order_uid is required".to_string()));
    }

    let order = lookup_order(&state.cache, state.store.as_ref(), order_uid).await?;
    Ok(Json(OrderResponse::new(order)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::new(&state.cache.stats()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::demo_order;
    use crate::storage::MemoryStore;
    use chrono::Utc;
    use std::num::NonZeroUsize;

    fn state(store: Arc<MemoryStore>) -> AppState {
        let cache = Arc::new(CacheEngine::cold(NonZeroUsize::new(8).unwrap()));
        AppState::new(cache, store)
    }

    #[tokio::test]
    async fn test_get_order_handler() {
        let store = Arc::new(MemoryStore::new());
        store.save(&demo_order("uid-1", Utc::now())).await.unwrap();
        let state = state(store);

        let response = get_order_handler(State(state.clone()), Path("uid-1".to_string()))
            .await
            .unwrap();
        assert_eq!(response.order.order_uid, "uid-1");
        assert!(state.cache.contains("uid-1"));
    }

    #[tokio::test]
    async fn test_blank_order_uid() {
        let state = state(Arc::new(MemoryStore::new()));
        let result = get_order_handler(State(state), Path("  ".to_string())).await;
        assert!(matches!(result, Err(ApiError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let state = state(Arc::new(MemoryStore::new()));
        let response = stats_handler(State(state)).await;
        assert_eq!(response.counters.hits, 0);
        assert_eq!(response.counters.capacity, 8);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
