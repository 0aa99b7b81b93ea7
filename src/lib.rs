//! Caching Proxy - A reverse-proxy cache
//!
//! Forwards cache misses to an origin server and serves hits from a bounded,
//! TTL-limited in-memory store.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod models;
pub mod proxy;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use lifecycle::{Lifecycle, LifecycleState};
pub use tasks::spawn_cleanup_task;
