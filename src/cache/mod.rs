//! Cache Module
//!
//! In-memory order cache with strict LRU eviction, warmed from storage.

mod engine;
mod lru;
mod preload;
mod stats;


// Re-export public types
pub use engine::CacheEngine;
pub use lru::{LruCore, PutOutcome};
pub use preload::{preload, PreloadReport};
pub use stats::CacheStats;
