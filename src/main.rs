//! Caching Proxy - A reverse-proxy cache
//!
//! Forwards cache misses to an origin server and serves hits from a bounded,
//! TTL-limited in-memory store.

use anyhow::Context;
use tokio::signal;
use tracing::{error, info};

use caching_proxy::api::create_router;
use caching_proxy::config::{Config, LogFormat, LogLevel};
use caching_proxy::logging::init_tracing;
use caching_proxy::{AppState, Lifecycle};

/// Main entry point for the caching proxy.
///
/// # Startup Sequence
/// 1. Load configuration from environment variables
/// 2. Initialize tracing subscriber for logging
/// 3. Validate configuration (fatal on failure)
/// 4. Create the cache store and start the background sweep
/// 5. Create Axum router with admin endpoints and the proxy fallback
/// 6. Start HTTP server on configured address
/// 7. On SIGINT/SIGTERM, drain connections, then stop the sweep
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();

    init_tracing(
        config.log_format().unwrap_or(LogFormat::Text),
        config.log_level().unwrap_or(LogLevel::Info),
    );
    info!("Starting caching proxy");

    if let Err(e) = config.validate() {
        error!(code = e.code(), error = %e, "Invalid configuration");
        return Err(e).context("configuration validation failed");
    }
    info!(
        origin = %config.origin,
        max_size = config.max_size,
        default_ttl_secs = config.default_ttl,
        cleanup_interval_secs = config.cleanup_interval,
        "Configuration loaded"
    );

    let mut lifecycle = Lifecycle::new(config.cache_config());
    lifecycle.start()?;

    let state = AppState::from_config(&config, &lifecycle)?;
    let app = create_router(state, &config.admin_prefix);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Proxy listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    lifecycle.shutdown().await?;
    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
