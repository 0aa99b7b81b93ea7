//! API Routes
//!
//! Configures the Axum router: administrative cache endpoints under a prefix,
//! everything else proxied to the origin.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::handlers::{clear_handler, delete_handler, proxy_handler, stats_handler, AppState};

/// Default prefix for the administrative routes.
pub const DEFAULT_ADMIN_PREFIX: &str = "/_cache";

/// Creates the main router.
///
/// # Endpoints
/// - `GET {prefix}/stats` - Cache statistics
/// - `POST {prefix}/clear` - Empty the cache
/// - `DELETE {prefix}/entries/:key` - Remove one cache key
/// - anything else - Proxied through the cache to the origin
///
/// Admin paths shadow the origin: a wrong method on one of them (e.g.
/// `GET {prefix}/clear`) gets 405 and is not proxied.
pub fn create_router(state: AppState, admin_prefix: &str) -> Router {
    let admin = Router::new()
        .route("/stats", get(stats_handler))
        .route("/clear", post(clear_handler))
        .route("/entries/:key", delete(delete_handler));

    Router::new()
        .nest(admin_prefix, admin)
        .fallback(proxy_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
