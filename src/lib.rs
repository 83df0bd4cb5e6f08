//! Order Cache - order lookup service with a bounded LRU read-through cache
//!
//! Orders arrive on a message stream, are persisted to PostgreSQL and are
//! served over HTTP from an in-memory cache warmed at startup.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod ingest;
pub mod models;
pub mod storage;
pub mod tasks;

pub use api::AppState;
pub use cache::CacheEngine;
pub use config::Config;
pub use storage::OrderStore;
