//! Auth API 模块

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

/// 认证路由
/// - /api/auth/login: 公开 (无需认证)
/// - /api/auth/me, /api/auth/logout: 需要登录 (全局 require_auth 中间件处理)
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/auth/login", post(handler::login))
        .route("/api/auth/me", get(handler::me))
        .route("/api/auth/logout", post(handler::logout))
}
