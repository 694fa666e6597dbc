//! Delivery Settings API 模块
//!
//! 单行配置: 配送费档位、代购手续费、门店时区。

mod handler;

use axum::{Router, middleware, routing::get, routing::put};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/delivery_settings", routes())
}

fn routes() -> Router<ServerState> {
    // 店面结账页需要费率表 (认证中间件白名单放行)
    let public_routes = Router::new().route("/", get(handler::get));

    let manage_routes = Router::new()
        .route("/", put(handler::update))
        .layer(middleware::from_fn(require_permission("settings:manage")));

    public_routes.merge(manage_routes)
}
