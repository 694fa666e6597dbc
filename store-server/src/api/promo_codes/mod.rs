//! Promo Code API 模块
//!
//! 店面只做校验预览, 真正的核销发生在结账事务里。

mod handler;

use axum::{Router, middleware, routing::get, routing::post, routing::put};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/promo_codes", routes())
}

fn routes() -> Router<ServerState> {
    // 购物车里的优惠码预检 (认证中间件白名单放行)
    let public_routes = Router::new().route("/validate", post(handler::validate));

    let manage_routes = Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", put(handler::update).delete(handler::delete))
        .layer(middleware::from_fn(require_permission("promos:manage")));

    public_routes.merge(manage_routes)
}
