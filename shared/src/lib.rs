//! Shared types for the grocery storefront
//!
//! Common types used by the server and admin clients: data models,
//! error codes, response structures, and small utilities.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use util::{now_millis, snowflake_id};
