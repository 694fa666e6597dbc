//! Category API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::category;
use crate::utils::{AppError, AppResult};
use shared::models::{Category, CategoryCreate, CategoryUpdate};

const RESOURCE: &str = "categories";

/// GET /api/categories - 店面分类列表 (仅启用的分类)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Category>>> {
    let categories = category::find_all(&state.pool).await?;
    Ok(Json(categories))
}

/// GET /api/categories/all - 后台分类列表 (含停用)
pub async fn list_all(State(state): State<ServerState>) -> AppResult<Json<Vec<Category>>> {
    let categories = category::find_all_admin(&state.pool).await?;
    Ok(Json(categories))
}

/// GET /api/categories/:id - 获取单个分类
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Category>> {
    let c = category::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Category {}", id)))?;
    Ok(Json(c))
}

/// POST /api/categories - 创建分类
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<Json<Category>> {
    let c = category::create(&state.pool, payload).await?;
    state.bump_sync(RESOURCE);
    Ok(Json(c))
}

/// PUT /api/categories/:id - 更新分类
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<Category>> {
    let c = category::update(&state.pool, id, payload).await?;
    state.bump_sync(RESOURCE);
    Ok(Json(c))
}

/// DELETE /api/categories/:id - 删除分类 (仍有商品时拒绝)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let result = category::delete(&state.pool, id).await?;
    if result {
        state.bump_sync(RESOURCE);
    }
    Ok(Json(result))
}
