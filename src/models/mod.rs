//! Response models for the caching proxy
//!
//! This module defines the DTOs serialized into administrative responses and
//! error bodies.

pub mod responses;

// Re-export commonly used types
pub use responses::{ClearResponse, DeleteResponse, ErrorBody, ErrorResponse, StatsResponse};
