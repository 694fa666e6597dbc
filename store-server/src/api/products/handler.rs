//! Product API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::product;
use crate::utils::{AppError, AppResult};
use shared::models::{Product, ProductCreate, ProductUpdate};

const RESOURCE: &str = "products";

/// 店面商品列表的查询参数
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// 按分类过滤
    pub category_id: Option<i64>,
}

/// GET /api/products - 店面商品列表 (仅在售, 可按分类过滤)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let products = product::find_all(&state.pool, query.category_id).await?;
    Ok(Json(products))
}

/// GET /api/products/all - 后台商品列表 (含下架)
pub async fn list_all(State(state): State<ServerState>) -> AppResult<Json<Vec<Product>>> {
    let products = product::find_all_admin(&state.pool).await?;
    Ok(Json(products))
}

/// GET /api/products/:id - 获取单个商品
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Product>> {
    let p = product::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {}", id)))?;
    Ok(Json(p))
}

/// POST /api/products - 创建商品
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<Product>> {
    let p = product::create(&state.pool, payload).await?;
    state.bump_sync(RESOURCE);
    Ok(Json(p))
}

/// PUT /api/products/:id - 更新商品
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    let p = product::update(&state.pool, id, payload).await?;
    state.bump_sync(RESOURCE);
    Ok(Json(p))
}

/// DELETE /api/products/:id - 删除商品
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let result = product::delete(&state.pool, id).await?;
    if result {
        state.bump_sync(RESOURCE);
    }
    Ok(Json(result))
}
