//! Promo Code API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::promo_code;
use crate::promo;
use crate::utils::AppResult;
use shared::models::{AppliedPromo, PromoCode, PromoCodeCreate, PromoCodeUpdate, PromoValidateRequest};

const RESOURCE: &str = "promo_codes";

/// POST /api/promo_codes/validate - 校验优惠码并预览折扣
///
/// 只读校验, 不占用次数。结账时会重新校验并原子核销。
pub async fn validate(
    State(state): State<ServerState>,
    Json(req): Json<PromoValidateRequest>,
) -> AppResult<Json<AppliedPromo>> {
    let applied = promo::validate_code(&state.pool, &req.code, req.subtotal_cents).await?;
    Ok(Json(applied))
}

/// GET /api/promo_codes - 后台优惠码列表
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<PromoCode>>> {
    let codes = promo_code::find_all(&state.pool).await?;
    Ok(Json(codes))
}

/// POST /api/promo_codes - 创建优惠码
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<PromoCodeCreate>,
) -> AppResult<Json<PromoCode>> {
    let code = promo_code::create(&state.pool, payload).await?;
    state.bump_sync(RESOURCE);
    Ok(Json(code))
}

/// PUT /api/promo_codes/:id - 更新优惠码
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<PromoCodeUpdate>,
) -> AppResult<Json<PromoCode>> {
    let code = promo_code::update(&state.pool, id, payload).await?;
    state.bump_sync(RESOURCE);
    Ok(Json(code))
}

/// DELETE /api/promo_codes/:id - 删除优惠码
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let result = promo_code::delete(&state.pool, id).await?;
    if result {
        state.bump_sync(RESOURCE);
    }
    Ok(Json(result))
}
