//! Time Slot API 模块
//!
//! 配送/自取时段排期。店面只看 available, 排期管理走 slots:manage。

mod handler;

use axum::{Router, middleware, routing::get, routing::post, routing::put};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/time_slots", routes())
}

fn routes() -> Router<ServerState> {
    // 店面可订时段 (认证中间件白名单放行)
    let public_routes = Router::new().route("/available", get(handler::list_available));

    let manage_routes = Router::new()
        .route("/all", get(handler::list_all))
        .route("/", post(handler::create))
        .route("/bulk", post(handler::bulk_create))
        .route("/{id}", put(handler::update).delete(handler::delete))
        .layer(middleware::from_fn(require_permission("slots:manage")));

    public_routes.merge(manage_routes)
}
