//! Repository Module
//!
//! CRUD operations over the SQLite pool. Repositories are free async
//! functions taking `&SqlitePool`; capacity counters (slot bookings,
//! promo uses) are maintained with single conditional UPDATE statements
//! so concurrent requests cannot oversell.

// Auth
pub mod user;

// Catalog
pub mod category;
pub mod product;
pub mod store;

// Scheduling
pub mod time_slot;

// Promotions
pub mod promo_code;

// Settings (singleton)
pub mod delivery_settings;

// Orders
pub mod bill;
pub mod order;
pub mod order_message;
pub mod pickup_order;

use shared::{AppError, ErrorCode};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        // Repo messages are already complete sentences, so bypass the
        // constructors that append their own suffix.
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Database(msg) => AppError::database(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
