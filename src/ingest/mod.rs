//! Ingestion Module
//!
//! Reads encoded orders from a stream and persists them. This is the only
//! path that introduces new orders; it never touches the cache.

mod source;
mod writer;

pub use source::{ChannelSource, LineSource, Message, MessageSource};
pub use writer::{run_ingestion, IngestReport, OrderHandler};
