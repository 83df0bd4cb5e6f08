//! Background Tasks Module
//!
//! Long-running tasks spawned at startup.
//!
//! # Tasks
//! - Preload: warms the cache from storage once, then exits
//! - Ingest: drains the order stream into storage until the source ends

mod ingest;
mod preload;

pub use ingest::spawn_ingest_task;
pub use preload::spawn_preload_task;
