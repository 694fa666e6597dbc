//! User API Handlers
//!
//! 响应一律是 UserInfo 投影, 密码哈希不出库。

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::user;
use crate::security_log;
use crate::utils::{AppError, AppResult};
use shared::models::{UserCreate, UserInfo, UserUpdate};

/// GET /api/users - 账号列表
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<UserInfo>>> {
    let users = user::find_all(&state.pool).await?;
    Ok(Json(users.iter().map(UserInfo::from).collect()))
}

/// POST /api/users - 开设账号
pub async fn create(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<UserCreate>,
) -> AppResult<Json<UserInfo>> {
    let created = user::create(&state.pool, payload).await?;
    security_log!(
        "INFO",
        "user_created",
        actor = current.username.clone(),
        username = created.username.clone(),
        is_admin = created.is_admin
    );
    Ok(Json(UserInfo::from(&created)))
}

/// PUT /api/users/:id - 更新账号 (改名、重置密码、停用)
pub async fn update(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<UserInfo>> {
    // 管理员也不能摘掉自己的管理员标记, 防止把最后一个管理员锁在门外
    if current.id == id && payload.is_admin == Some(false) {
        return Err(AppError::forbidden("Cannot revoke your own admin access"));
    }
    let updated = user::update(&state.pool, id, payload).await?;
    security_log!(
        "INFO",
        "user_updated",
        actor = current.username.clone(),
        username = updated.username.clone()
    );
    Ok(Json(UserInfo::from(&updated)))
}

/// DELETE /api/users/:id - 删除账号
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    if current.id == id {
        return Err(AppError::forbidden("Cannot delete your own account"));
    }
    let removed = user::delete(&state.pool, id).await?;
    security_log!(
        "WARN",
        "user_deleted",
        actor = current.username.clone(),
        user_id = id
    );
    Ok(Json(removed))
}
