//! Order aggregate and HTTP response models
//!
//! `order` holds the record that flows from the stream into storage and the
//! cache; `responses` holds the DTOs serialized by the lookup API.

pub mod order;
pub mod responses;

// Re-export commonly used types
pub use order::{demo_order, validation_messages, Delivery, Item, Order, Payment};
pub use responses::{ErrorResponse, HealthResponse, OrderResponse, StatsResponse};
