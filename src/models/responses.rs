//! Response DTOs for the caching proxy
//!
//! Defines the structure of outgoing administrative and error bodies.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cache::CacheStats;
use crate::error::{ErrorKind, ProxyError};

/// Response body for the stats endpoint (GET {prefix}/stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of evictions (size-bound and TTL)
    pub evictions: u64,
    /// Current number of cached responses
    pub size: usize,
    /// Time of the last clear
    pub last_cleared: DateTime<Utc>,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            size: stats.size,
            last_cleared: stats.last_cleared,
        }
    }
}

/// Response body for the clear operation (POST {prefix}/clear)
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    /// Success message
    pub message: String,
    /// Time the cache was cleared
    pub last_cleared: DateTime<Utc>,
}

impl ClearResponse {
    pub fn new(last_cleared: DateTime<Utc>) -> Self {
        Self {
            message: "Cache cleared successfully".to_string(),
            last_cleared,
        }
    }
}

/// Response body for the delete operation (DELETE {prefix}/entries/:key)
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// The key that was deleted
    pub key: String,
}

impl DeleteResponse {
    /// Creates a new DeleteResponse
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted successfully", key),
            key,
        }
    }
}

/// Structured error details.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    /// Error classification
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    /// Stable machine-readable code
    pub code: &'static str,
    /// Human-readable description
    pub message: String,
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

impl ErrorResponse {
    pub fn from_error(error: &ProxyError) -> Self {
        Self {
            error: ErrorBody {
                kind: error.kind(),
                code: error.code(),
                message: error.message(),
            },
        }
    }
}
