//! Configuration Module
//!
//! Handles loading and validating proxy configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::error::{ProxyError, Result};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = ProxyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(ProxyError::validation(
                "INVALID_LOG_FORMAT",
                format!("log format must be json or text, got '{}'", other),
            )),
        }
    }
}

/// Minimum severity of emitted log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive name understood by `EnvFilter`.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = ProxyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(ProxyError::validation(
                "INVALID_LOG_LEVEL",
                format!("log level must be one of: debug, info, warn, error, got '{}'", other),
            )),
        }
    }
}

/// Proxy configuration parameters.
///
/// All values can be configured via `PROXY_*` environment variables. Only the
/// origin has no usable default.
#[derive(Debug, Clone)]
pub struct Config {
    /// Interface to bind the server to
    pub host: String,
    /// HTTP server port
    pub port: u16,
    /// Origin server base URL (raw, validated by `validate`)
    pub origin: String,
    /// Timeout in seconds for a full origin round trip
    pub request_timeout: u64,
    /// Maximum number of cached responses
    pub max_size: usize,
    /// Default TTL in seconds applied to cached responses (0 = never expires)
    pub default_ttl: u64,
    /// Background expiry sweep interval in seconds
    pub cleanup_interval: u64,
    /// Largest response body, in bytes, the cache will accept
    pub max_entry_bytes: usize,
    /// Path prefix for the administrative routes
    pub admin_prefix: String,
    /// Raw log format name
    pub log_format: String,
    /// Raw log level name
    pub log_level: String,
}

/// The subset of configuration consumed by the cache engine.
#[derive(Debug, Clone, Copy)]
pub struct CacheConfig {
    pub max_size: usize,
    pub default_ttl: Duration,
    pub cleanup_interval: Duration,
    pub max_entry_bytes: usize,
}

/// The subset of configuration consumed by the origin forwarder.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub origin: Url,
    pub request_timeout: Duration,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `PROXY_HOST` - Bind address (default: 0.0.0.0)
    /// - `PROXY_PORT` - HTTP server port (default: 3000)
    /// - `PROXY_ORIGIN` - Origin base URL (no default)
    /// - `PROXY_TIMEOUT` - Origin timeout in seconds (default: 30)
    /// - `PROXY_CACHE_SIZE` - Maximum cached responses (default: 1000)
    /// - `PROXY_CACHE_TTL` - Default TTL in seconds, 0 disables expiry (default: 300)
    /// - `PROXY_CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 60)
    /// - `PROXY_MAX_ENTRY_BYTES` - Largest cacheable body (default: 10 MiB)
    /// - `PROXY_ADMIN_PREFIX` - Admin route prefix (default: /_cache)
    /// - `PROXY_LOG_FORMAT` - `text` or `json` (default: text)
    /// - `PROXY_LOG_LEVEL` - `debug`, `info`, `warn` or `error` (default: info)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env::var("PROXY_HOST").unwrap_or(defaults.host),
            port: parse_env("PROXY_PORT").unwrap_or(defaults.port),
            origin: env::var("PROXY_ORIGIN").unwrap_or(defaults.origin),
            request_timeout: parse_env("PROXY_TIMEOUT").unwrap_or(defaults.request_timeout),
            max_size: parse_env("PROXY_CACHE_SIZE").unwrap_or(defaults.max_size),
            default_ttl: parse_env("PROXY_CACHE_TTL").unwrap_or(defaults.default_ttl),
            cleanup_interval: parse_env("PROXY_CLEANUP_INTERVAL")
                .unwrap_or(defaults.cleanup_interval),
            max_entry_bytes: parse_env("PROXY_MAX_ENTRY_BYTES")
                .unwrap_or(defaults.max_entry_bytes),
            admin_prefix: env::var("PROXY_ADMIN_PREFIX").unwrap_or(defaults.admin_prefix),
            log_format: env::var("PROXY_LOG_FORMAT").unwrap_or(defaults.log_format),
            log_level: env::var("PROXY_LOG_LEVEL").unwrap_or(defaults.log_level),
        }
    }

    /// Validates the configuration. Any failure here is fatal at startup.
    pub fn validate(&self) -> Result<()> {
        self.origin_url()?;

        if self.port == 0 {
            return Err(ProxyError::validation(
                "INVALID_PORT",
                "port must be between 1 and 65535",
            ));
        }
        if self.request_timeout == 0 {
            return Err(ProxyError::validation(
                "INVALID_TIMEOUT",
                "timeout must be positive",
            ));
        }
        if self.max_size == 0 {
            return Err(ProxyError::validation(
                "INVALID_CACHE_SIZE",
                "cache size must be positive",
            ));
        }
        if self.cleanup_interval == 0 {
            return Err(ProxyError::validation(
                "INVALID_CLEANUP_INTERVAL",
                "cleanup interval must be positive",
            ));
        }
        if !self.admin_prefix.starts_with('/') || self.admin_prefix.len() < 2 {
            return Err(ProxyError::validation(
                "INVALID_ADMIN_PREFIX",
                "admin prefix must start with '/' and not be the root path",
            ));
        }
        self.log_format()?;
        self.log_level()?;

        Ok(())
    }

    /// Parses the origin into an absolute http(s) URL.
    pub fn origin_url(&self) -> Result<Url> {
        if self.origin.is_empty() {
            return Err(ProxyError::validation(
                "MISSING_ORIGIN",
                "origin server URL is required",
            ));
        }

        let url = Url::parse(&self.origin).map_err(|e| {
            ProxyError::validation(
                "INVALID_ORIGIN_URL",
                format!("origin server URL is invalid: {}", e),
            )
        })?;

        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(ProxyError::validation(
                "INVALID_ORIGIN_URL",
                "origin server URL must be an absolute http(s) URL",
            ));
        }

        Ok(url)
    }

    pub fn log_format(&self) -> Result<LogFormat> {
        self.log_format.parse()
    }

    pub fn log_level(&self) -> Result<LogLevel> {
        self.log_level.parse()
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            max_size: self.max_size,
            default_ttl: Duration::from_secs(self.default_ttl),
            cleanup_interval: Duration::from_secs(self.cleanup_interval),
            max_entry_bytes: self.max_entry_bytes,
        }
    }

    pub fn proxy_config(&self) -> Result<ProxyConfig> {
        Ok(ProxyConfig {
            origin: self.origin_url()?,
            request_timeout: Duration::from_secs(self.request_timeout),
        })
    }

    /// Socket address string the server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            origin: String::new(),
            request_timeout: 30,
            max_size: 1000,
            default_ttl: 300,
            cleanup_interval: 60,
            max_entry_bytes: 10 * 1024 * 1024,
            admin_prefix: "/_cache".to_string(),
            log_format: "text".to_string(),
            log_level: "info".to_string(),
        }
    }
}

fn parse_env<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}
