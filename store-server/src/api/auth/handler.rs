//! Auth API Handlers
//!
//! 登录使用固定延迟和统一错误文案，避免计时攻击与用户名枚举。

use std::time::Duration;

use axum::{Json, extract::State};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::user;
use crate::security_log;
use crate::utils::{AppError, AppResult};
use shared::models::{LoginRequest, LoginResponse, UserInfo};

/// 认证固定延迟 (毫秒), 防止计时攻击
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// POST /api/auth/login - 账号密码登录
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let found = user::find_by_username(&state.pool, &req.username).await?;

    // 固定延迟放在判定之前，成功与失败路径耗时一致
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let account = match found {
        Some(account) => account,
        None => {
            security_log!(
                "WARN",
                "login_failed",
                username = req.username.clone(),
                reason = "user_not_found"
            );
            return Err(AppError::invalid_credentials());
        }
    };

    if !account.is_active {
        security_log!(
            "WARN",
            "login_failed",
            username = req.username.clone(),
            reason = "account_disabled"
        );
        return Err(AppError::forbidden("Account has been disabled"));
    }

    let password_valid = user::verify_password(&account.password_hash, &req.password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;
    if !password_valid {
        security_log!(
            "WARN",
            "login_failed",
            username = req.username.clone(),
            reason = "invalid_password"
        );
        return Err(AppError::invalid_credentials());
    }

    let info = UserInfo::from(&account);
    let role = if account.is_admin { "admin" } else { "staff" };
    let token = state
        .jwt_service()
        .generate_token(account.id, &account.username, role, &info.permissions)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;
    let expires_at = shared::util::now_millis() + state.config.jwt.expiration_minutes * 60 * 1000;

    security_log!(
        "INFO",
        "login_success",
        user_id = account.id,
        username = account.username.clone()
    );
    tracing::info!(
        user_id = account.id,
        username = %account.username,
        role = role,
        "User logged in"
    );

    Ok(Json(LoginResponse {
        token,
        expires_at,
        user: info,
    }))
}

/// GET /api/auth/me - 当前登录用户信息
///
/// 重新查库而不是回显令牌声明，禁用的账号在这里立即暴露。
pub async fn me(
    State(state): State<ServerState>,
    current: CurrentUser,
) -> AppResult<Json<UserInfo>> {
    let account = user::find_by_id(&state.pool, current.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {}", current.id)))?;
    Ok(Json(UserInfo::from(&account)))
}

/// POST /api/auth/logout - 登出 (JWT 无状态, 仅记录日志)
pub async fn logout(current: CurrentUser) -> AppResult<Json<()>> {
    tracing::info!(
        user_id = current.id,
        username = %current.username,
        "User logged out"
    );
    Ok(Json(()))
}
