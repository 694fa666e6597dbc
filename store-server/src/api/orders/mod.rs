//! Order API 模块
//!
//! 配送订单的下单、跟踪与后台管理。下单和凭单号查询是公开的,
//! 列表与状态推进需要 orders:read / orders:write 权限。

mod handler;

use axum::{Router, middleware, routing::delete, routing::get, routing::post, routing::put};

use crate::auth::require_permission;
use crate::core::ServerState;

/// Order router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    // 顾客侧: 下单、凭单号跟踪、留言、支付回调 (认证中间件白名单放行)
    let public_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", get(handler::get_detail))
        .route(
            "/{id}/messages",
            get(handler::list_messages).post(handler::post_message),
        )
        .route("/{id}/payment", post(handler::update_payment));

    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}/bills", get(handler::list_bills))
        .layer(middleware::from_fn(require_permission("orders:read")));

    let write_routes = Router::new()
        .route("/{id}/status", put(handler::update_status))
        .route("/{id}/payment", put(handler::update_payment))
        .route("/{id}/bills", post(handler::post_bill))
        .route("/{id}", delete(handler::delete))
        .layer(middleware::from_fn(require_permission("orders:write")));

    public_routes.merge(read_routes).merge(write_routes)
}
