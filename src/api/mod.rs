//! API Module
//!
//! HTTP handlers and routing for the caching proxy.
//!
//! # Endpoints
//! - `GET /_cache/stats` - Cache statistics
//! - `POST /_cache/clear` - Empty the cache
//! - `DELETE /_cache/entries/:key` - Remove one cache key
//! - `* /*` - Proxied through the cache to the origin

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::{create_router, DEFAULT_ADMIN_PREFIX};
