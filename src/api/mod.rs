//! API Module
//!
//! HTTP read path for orders.
//!
//! # Endpoints
//! - `GET /order/:order_uid` - Look up an order (cache first, then store)
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod lookup;
pub mod routes;

pub use handlers::*;
pub use lookup::lookup_order;
pub use routes::create_router;
