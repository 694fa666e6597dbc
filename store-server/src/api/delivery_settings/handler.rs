//! Delivery Settings API Handlers

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::db::repository::delivery_settings;
use crate::utils::AppResult;
use shared::models::{DeliverySettings, DeliverySettingsUpdate};

const RESOURCE: &str = "delivery_settings";

/// GET /api/delivery_settings - 获取配送设置 (首次访问播种默认行)
pub async fn get(State(state): State<ServerState>) -> AppResult<Json<DeliverySettings>> {
    let settings = delivery_settings::get_or_create(&state.pool).await?;
    Ok(Json(settings))
}

/// PUT /api/delivery_settings - 更新配送设置
///
/// 时区在仓储层校验, 无效的 IANA 名称不会落库。
pub async fn update(
    State(state): State<ServerState>,
    Json(payload): Json<DeliverySettingsUpdate>,
) -> AppResult<Json<DeliverySettings>> {
    let settings = delivery_settings::update(&state.pool, payload).await?;
    state.bump_sync(RESOURCE);
    Ok(Json(settings))
}
