//! Pickup Order (grocery run) API 模块
//!
//! 多店代购单: 顾客挑几家店、各自报预估金额, 代购员逐店采买。
//! 下单和凭单号查询公开, 管理接口走 orders:read / orders:write。

mod handler;

use axum::{
    Router, middleware, routing::delete, routing::get, routing::patch, routing::post,
    routing::put,
};

use crate::auth::require_permission;
use crate::core::ServerState;

/// Pickup order router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/pickup_orders", routes())
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
        .route("/{id}/stores/{entry_id}", patch(handler::update_store_entry))
        .route("/{id}/bills", post(handler::post_bill))
        .route("/{id}", delete(handler::delete))
        .layer(middleware::from_fn(require_permission("orders:write")));

    public_routes.merge(read_routes).merge(write_routes)
}
