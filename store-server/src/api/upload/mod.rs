//! Image API 模块
//!
//! 商品图、店铺图和采购小票走同一条上传管道。上传需要登录
//! (小票和目录图都从这里进来), 读取公开 (店面直接引用图片 URL),
//! 删除需要 catalog:write。

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

use crate::auth::require_permission;
use crate::core::ServerState;

/// Image router
pub fn router() -> Router<ServerState> {
    let open_routes = Router::new()
        .route("/api/image/upload", post(handler::upload))
        .route("/api/image/{filename}", get(handler::serve));

    let manage_routes = Router::new()
        .route("/api/image/{filename}", delete(handler::delete))
        .layer(middleware::from_fn(require_permission("catalog:write")));

    open_routes.merge(manage_routes)
}
