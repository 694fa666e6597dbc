//! Store API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::store;
use crate::utils::{AppError, AppResult};
use shared::models::{Store, StoreCreate, StoreUpdate};

const RESOURCE: &str = "stores";

/// GET /api/stores - 店面店铺列表 (仅营业中)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Store>>> {
    let stores = store::find_all(&state.pool).await?;
    Ok(Json(stores))
}

/// GET /api/stores/all - 后台店铺列表 (含停用)
pub async fn list_all(State(state): State<ServerState>) -> AppResult<Json<Vec<Store>>> {
    let stores = store::find_all_admin(&state.pool).await?;
    Ok(Json(stores))
}

/// GET /api/stores/:id - 获取单个店铺
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Store>> {
    let s = store::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Store {}", id)))?;
    Ok(Json(s))
}

/// POST /api/stores - 创建店铺
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<StoreCreate>,
) -> AppResult<Json<Store>> {
    let s = store::create(&state.pool, payload).await?;
    state.bump_sync(RESOURCE);
    Ok(Json(s))
}

/// PUT /api/stores/:id - 更新店铺
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<StoreUpdate>,
) -> AppResult<Json<Store>> {
    let s = store::update(&state.pool, id, payload).await?;
    state.bump_sync(RESOURCE);
    Ok(Json(s))
}

/// DELETE /api/stores/:id - 删除店铺 (被代购单引用时拒绝)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let result = store::delete(&state.pool, id).await?;
    if result {
        state.bump_sync(RESOURCE);
    }
    Ok(Json(result))
}
