//! Logging setup
//!
//! Installs the global tracing subscriber.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, LogLevel};

/// Filter used when `RUST_LOG` is not set: `level` for this crate and
/// tower-http.
pub fn default_filter(level: LogLevel) -> String {
    format!("caching_proxy={0},tower_http={0}", level.as_str())
}

/// Initializes the tracing subscriber with an env filter and the chosen
/// output format. `RUST_LOG` takes precedence over `level`.
pub fn init_tracing(format: LogFormat, level: LogLevel) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(level)));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}
