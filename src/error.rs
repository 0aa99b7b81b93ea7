//! Error types for the caching proxy
//!
//! Provides a closed error taxonomy using thiserror. Every variant maps to a
//! fixed HTTP status class and renders as a structured JSON body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::models::ErrorResponse;

// == Error Kind ==
/// Machine-readable classification carried in every error body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Network,
    Internal,
    NotFound,
}

// == Proxy Error Enum ==
/// Unified error type for the caching proxy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProxyError {
    /// Bad configuration, fatal at startup
    #[error("{code}: {message}")]
    Validation { code: &'static str, message: String },

    /// Origin unreachable, timed out, or failed mid-transfer
    #[error("{code}: {message}")]
    Network { code: &'static str, message: String },

    /// Request construction or cache-internal failure
    #[error("{code}: {message}")]
    Internal { code: &'static str, message: String },

    /// Explicit lookup of an absent key
    #[error("Key not found: {0}")]
    NotFound(String),
}

impl ProxyError {
    pub fn validation(code: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            code,
            message: message.into(),
        }
    }

    pub fn network(code: &'static str, message: impl Into<String>) -> Self {
        Self::Network {
            code,
            message: message.into(),
        }
    }

    pub fn internal(code: &'static str, message: impl Into<String>) -> Self {
        Self::Internal {
            code,
            message: message.into(),
        }
    }

    /// Returns the error classification.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProxyError::Validation { .. } => ErrorKind::Validation,
            ProxyError::Network { .. } => ErrorKind::Network,
            ProxyError::Internal { .. } => ErrorKind::Internal,
            ProxyError::NotFound(_) => ErrorKind::NotFound,
        }
    }

    /// Returns the stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            ProxyError::Validation { code, .. }
            | ProxyError::Network { code, .. }
            | ProxyError::Internal { code, .. } => code,
            ProxyError::NotFound(_) => "KEY_NOT_FOUND",
        }
    }

    /// Returns the human-readable message.
    pub fn message(&self) -> String {
        match self {
            ProxyError::Validation { message, .. }
            | ProxyError::Network { message, .. }
            | ProxyError::Internal { message, .. } => message.clone(),
            ProxyError::NotFound(key) => format!("Key not found: {}", key),
        }
    }

    /// Fixed HTTP status for each error kind.
    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Network => StatusCode::BAD_GATEWAY,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse::from_error(&self));
        (self.status_code(), body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the caching proxy.
pub type Result<T> = std::result::Result<T, ProxyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_per_kind() {
        assert_eq!(
            ProxyError::validation("X", "bad").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ProxyError::network("X", "down").status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ProxyError::internal("X", "boom").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ProxyError::NotFound("k".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_code_and_message() {
        let err = ProxyError::network("ORIGIN_TIMEOUT", "origin timed out");
        assert_eq!(err.kind(), ErrorKind::Network);
        assert_eq!(err.code(), "ORIGIN_TIMEOUT");
        assert_eq!(err.message(), "origin timed out");
        assert_eq!(err.to_string(), "ORIGIN_TIMEOUT: origin timed out");
    }

    #[test]
    fn test_not_found_code() {
        let err = ProxyError::NotFound("abc".to_string());
        assert_eq!(err.code(), "KEY_NOT_FOUND");
        assert!(err.message().contains("abc"));
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorKind::NotFound).unwrap();
        assert_eq!(json, "\"not_found\"");
    }
}
