//! 统一错误处理
//!
//! Error types live in `shared::error` so the admin dashboard and server
//! agree on codes; this module re-exports them under one import path.
//!
//! # 使用示例
//!
//! ```ignore
//! // 返回错误 (构造器会补上 " not found" 后缀)
//! Err(AppError::not_found("Order 42"))
//!
//! // 精确错误码
//! Err(AppError::new(ErrorCode::SlotFull))
//! ```

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
