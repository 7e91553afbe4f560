//! Shared types for the store platform
//!
//! Common types used by the server and any future clients: the unified
//! error code system, the rich application error type, and the API
//! response envelope.

pub mod error;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use http;
