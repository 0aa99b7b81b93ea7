//! Request Dispatcher
//!
//! Per-request orchestration between the cache and the origin forwarder.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::Request;
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use tracing::{debug, info, warn};

use crate::cache::{generate_key, Cache, CacheEntry};
use crate::error::Result;
use crate::proxy::OriginForwarder;

/// Header carrying the cache outcome on every proxied response.
pub const CACHE_STATUS_HEADER: HeaderName = HeaderName::from_static("x-cache");

/// Outcome of the cache lookup for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
        }
    }

    pub fn header_value(self) -> HeaderValue {
        HeaderValue::from_static(self.as_str())
    }
}

// == Request Dispatcher ==
/// Serves requests from the cache, falling back to the origin on a miss.
///
/// Holds no per-request state. Concurrent misses for the same key each reach
/// the origin independently.
pub struct RequestDispatcher {
    cache: Arc<dyn Cache>,
    forwarder: OriginForwarder,
    default_ttl: Duration,
}

impl RequestDispatcher {
    pub fn new(cache: Arc<dyn Cache>, forwarder: OriginForwarder, default_ttl: Duration) -> Self {
        Self {
            cache,
            forwarder,
            default_ttl,
        }
    }

    pub fn cache(&self) -> &Arc<dyn Cache> {
        &self.cache
    }

    // == Dispatch ==
    /// Handles one inbound request.
    ///
    /// A hit is answered from the store without contacting the origin. A miss
    /// is forwarded; a successful origin response is stored and returned with
    /// `MISS` even if storing it failed. A forwarder error is returned as-is
    /// and nothing is written to the cache.
    pub async fn dispatch(&self, request: Request) -> Result<Response> {
        let (parts, body) = request.into_parts();
        let path = parts.uri.path();
        let query = parts.uri.query();
        let key = generate_key(parts.method.as_str(), path, query.unwrap_or(""));

        debug!(method = %parts.method, path, cache_key = %key, "Processing request");

        if let Some(entry) = self.cache.get(&key) {
            info!(cache_key = %key, "Cache hit");
            return Ok(build_response(
                entry.status,
                entry.headers.clone(),
                entry.body.clone(),
                CacheStatus::Hit,
            ));
        }

        info!(cache_key = %key, "Cache miss - forwarding to origin");
        let origin = self
            .forwarder
            .fetch(parts.method.clone(), path, query, &parts.headers, body)
            .await
            .map_err(|e| {
                warn!(cache_key = %key, error = %e, "Origin fetch failed");
                e
            })?;

        let entry = CacheEntry::new(origin.status, origin.headers.clone(), origin.body.clone());
        if let Err(e) = self.cache.set(&key, entry, self.default_ttl) {
            warn!(cache_key = %key, error = %e, "Failed to cache origin response");
        }

        Ok(build_response(
            origin.status,
            origin.headers,
            origin.body,
            CacheStatus::Miss,
        ))
    }
}

fn build_response(
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    cache_status: CacheStatus,
) -> Response {
    let mut response = Body::from(body).into_response();
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
        .headers_mut()
        .insert(CACHE_STATUS_HEADER, cache_status.header_value());
    response
}
