//! API Handlers
//!
//! The proxy fallback handler and the administrative cache endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    response::{IntoResponse, Response},
    Json,
};

use crate::cache::Cache;
use crate::config::Config;
use crate::error::{ProxyError, Result};
use crate::lifecycle::Lifecycle;
use crate::models::{ClearResponse, DeleteResponse, StatsResponse};
use crate::proxy::{CacheStatus, OriginForwarder, RequestDispatcher, CACHE_STATUS_HEADER};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Cache/origin orchestration for proxied requests
    pub dispatcher: Arc<RequestDispatcher>,
    /// The same store the dispatcher uses, for the admin surface
    pub cache: Arc<dyn Cache>,
}

impl AppState {
    /// Creates a new AppState over the given cache and forwarder.
    pub fn new(
        cache: Arc<dyn Cache>,
        forwarder: OriginForwarder,
        default_ttl: std::time::Duration,
    ) -> Self {
        Self {
            dispatcher: Arc::new(RequestDispatcher::new(
                Arc::clone(&cache),
                forwarder,
                default_ttl,
            )),
            cache,
        }
    }

    /// Creates a new AppState from configuration and a started lifecycle.
    pub fn from_config(config: &Config, lifecycle: &Lifecycle) -> Result<Self> {
        let forwarder = OriginForwarder::new(&config.proxy_config()?)?;
        let cache: Arc<dyn Cache> = lifecycle.store();
        Ok(Self::new(cache, forwarder, config.cache_config().default_ttl))
    }
}

/// Fallback handler: every non-admin request is proxied.
///
/// Error responses carry `MISS`, since only a miss reaches the origin.
pub async fn proxy_handler(State(state): State<AppState>, request: Request) -> Response {
    match state.dispatcher.dispatch(request).await {
        Ok(response) => response,
        Err(err) => {
            let mut response = err.into_response();
            response
                .headers_mut()
                .insert(CACHE_STATUS_HEADER, CacheStatus::Miss.header_value());
            response
        }
    }
}

/// Handler for GET {prefix}/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.cache.stats()))
}

/// Handler for POST {prefix}/clear
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    state.cache.clear();
    let stats = state.cache.stats();
    tracing::info!("Cache cleared");
    Json(ClearResponse::new(stats.last_cleared))
}

/// Handler for DELETE {prefix}/entries/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    if state.cache.delete(&key) {
        Ok(Json(DeleteResponse::new(key)))
    } else {
        Err(ProxyError::NotFound(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{generate_key, CacheEntry, CacheStore};
    use crate::config::ProxyConfig;
    use axum::http::{HeaderMap, StatusCode};
    use bytes::Bytes;
    use std::time::Duration;
    use url::Url;

    fn test_state() -> AppState {
        let forwarder = OriginForwarder::new(&ProxyConfig {
            origin: Url::parse("http://127.0.0.1:9").unwrap(),
            request_timeout: Duration::from_secs(2),
        })
        .unwrap();
        AppState::new(
            Arc::new(CacheStore::new(100, 1024)),
            forwarder,
            Duration::from_secs(60),
        )
    }

    fn seed(state: &AppState, key: &str) {
        state
            .cache
            .set(
                key,
                CacheEntry::new(StatusCode::OK, HeaderMap::new(), Bytes::from("v")),
                Duration::ZERO,
            )
            .unwrap();
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let state = test_state();

        let response = stats_handler(State(state)).await;
        assert_eq!(response.hits, 0);
        assert_eq!(response.misses, 0);
        assert_eq!(response.size, 0);
    }

    #[tokio::test]
    async fn test_clear_handler() {
        let state = test_state();
        seed(&state, "a");
        seed(&state, "b");

        let response = clear_handler(State(state.clone())).await;
        assert!(response.message.contains("cleared"));
        assert_eq!(state.cache.size(), 0);
    }

    #[tokio::test]
    async fn test_delete_handler() {
        let state = test_state();
        let key = generate_key("GET", "/a", "");
        seed(&state, &key);

        let result = delete_handler(State(state.clone()), Path(key.clone())).await;
        assert!(result.is_ok());

        let result = delete_handler(State(state), Path(key)).await;
        assert!(matches!(result, Err(ProxyError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_proxy_handler_error_carries_miss() {
        let state = test_state();
        let request = Request::builder()
            .uri("/unreachable")
            .body(axum::body::Body::empty())
            .unwrap();

        let response = proxy_handler(State(state), request).await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(response.headers()[CACHE_STATUS_HEADER], "MISS");
    }
}
