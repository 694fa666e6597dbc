//! Product API 模块

mod handler;

use axum::{Router, middleware, routing::get, routing::post, routing::put};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/products", routes())
}

fn routes() -> Router<ServerState> {
    // 店面公开列表, 支持 ?category_id= 过滤
    let public_routes = Router::new().route("/", get(handler::list));

    let read_routes = Router::new()
        .route("/all", get(handler::list_all))
        .route("/{id}", get(handler::get_by_id))
        .layer(middleware::from_fn(require_permission("catalog:read")));

    let write_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", put(handler::update).delete(handler::delete))
        .layer(middleware::from_fn(require_permission("catalog:write")));

    public_routes.merge(read_routes).merge(write_routes)
}
