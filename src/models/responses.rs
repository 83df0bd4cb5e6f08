//! Response DTOs for the order lookup API
//!
//! Defines the structure of outgoing HTTP response bodies.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::order::Order;
use crate::cache::CacheStats;

/// Response body for GET /order/:order_uid
#[derive(Debug, Clone, Serialize)]
pub struct OrderResponse {
    /// The requested order
    pub order: Arc<Order>,
}

impl OrderResponse {
    /// Creates a new OrderResponse
    pub fn new(order: Arc<Order>) -> Self {
        Self { order }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub counters: CacheStats,
    /// hits / (hits + misses)
    pub hit_rate: f64,
}

impl StatsResponse {
    pub fn new(stats: &CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            counters: stats.clone(),
        }
    }
}

/// Response body for GET /health
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy",
            timestamp: Utc::now(),
        }
    }
}

/// `{"error": ...}` body shared by every failure status.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::demo_order;

    #[test]
    fn test_order_response_wraps_order() {
        let order = Arc::new(demo_order("uid-7", chrono::Utc::now()));
        let json = serde_json::to_value(OrderResponse::new(order)).unwrap();
        assert_eq!(json["order"]["order_uid"], "uid-7");
    }

    #[test]
    fn test_stats_response_is_flat() {
        let stats = CacheStats {
            hits: 80,
            misses: 20,
            evictions: 5,
            total_entries: 100,
            capacity: 100,
            ..CacheStats::default()
        };
        let json = serde_json::to_value(StatsResponse::new(&stats)).unwrap();
        assert_eq!(json["hits"], 80);
        assert_eq!(json["capacity"], 100);
        assert!((json["hit_rate"].as_f64().unwrap() - 0.8).abs() < 0.001);
        assert!(json.get("counters").is_none());
    }

    #[test]
    fn test_stats_response_zero_requests() {
        let resp = StatsResponse::new(&CacheStats::default());
        assert_eq!(resp.hit_rate, 0.0);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("order not found");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("error"));
        assert!(json.contains("order not found"));
    }
}
