//! Sync API 模块

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/sync", routes())
}

fn routes() -> Router<ServerState> {
    // 任何登录账号都可以轮询, 不需要额外权限
    Router::new().route("/versions", get(handler::get_versions))
}
