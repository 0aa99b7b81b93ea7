//! Proxy Module
//!
//! Origin forwarding and the per-request cache/origin orchestration.

mod dispatcher;
mod forwarder;

pub use dispatcher::{CacheStatus, RequestDispatcher, CACHE_STATUS_HEADER};
pub use forwarder::{ForwardError, OriginForwarder, OriginResponse};
