//! Time Slot API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::repository::{delivery_settings, time_slot};
use crate::scheduling;
use crate::utils::{AppResult, time};
use shared::models::{
    BulkCreateResult, SlotType, TimeSlot, TimeSlotBulkCreate, TimeSlotCreate, TimeSlotUpdate,
};

const RESOURCE: &str = "time_slots";

/// 店面可订时段查询参数
#[derive(Debug, Deserialize)]
pub struct AvailableQuery {
    pub slot_type: SlotType,
}

/// 可订时段加 12 小时制展示文案
#[derive(Debug, Serialize)]
pub struct AvailableSlot {
    #[serde(flatten)]
    pub slot: TimeSlot,
    /// 如 `9:00 AM - 11:00 AM`
    pub display_time: String,
}

/// 后台时段列表查询参数
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub slot_type: Option<SlotType>,
}

/// GET /api/time_slots/available - 店面可订时段 (未满、未过期、启用中)
///
/// "今天" 按门店配置的时区计算，而不是服务器时钟。
pub async fn list_available(
    State(state): State<ServerState>,
    Query(query): Query<AvailableQuery>,
) -> AppResult<Json<Vec<AvailableSlot>>> {
    let settings = delivery_settings::get_or_create(&state.pool).await?;
    let tz = time::parse_zone(&settings.timezone)?;
    let today = time::today_in_zone(tz);
    let slots = time_slot::find_open(&state.pool, query.slot_type, &today).await?;
    let slots = slots
        .into_iter()
        .map(|slot| {
            let display_time = format!(
                "{} - {}",
                time::format_time_12h(&slot.start_time)?,
                time::format_time_12h(&slot.end_time)?
            );
            Ok(AvailableSlot { slot, display_time })
        })
        .collect::<AppResult<Vec<_>>>()?;
    Ok(Json(slots))
}

/// GET /api/time_slots/all - 后台时段列表 (可按类型过滤)
pub async fn list_all(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<TimeSlot>>> {
    let slots = time_slot::find_all_admin(&state.pool, query.slot_type).await?;
    Ok(Json(slots))
}

/// POST /api/time_slots - 创建单个时段
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<TimeSlotCreate>,
) -> AppResult<Json<TimeSlot>> {
    let slot = scheduling::create_slot(&state.pool, payload).await?;
    state.bump_sync(RESOURCE);
    Ok(Json(slot))
}

/// POST /api/time_slots/bulk - 按日期批量创建时段
///
/// 逐日提交, 失败的日期单独上报, 已创建的保留。
pub async fn bulk_create(
    State(state): State<ServerState>,
    Json(payload): Json<TimeSlotBulkCreate>,
) -> AppResult<Json<BulkCreateResult>> {
    let result = scheduling::bulk_create(&state.pool, payload).await?;
    if !result.created.is_empty() {
        state.bump_sync(RESOURCE);
    }
    Ok(Json(result))
}

/// PUT /api/time_slots/:id - 更新时段
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<TimeSlotUpdate>,
) -> AppResult<Json<TimeSlot>> {
    let slot = scheduling::update_slot(&state.pool, id, payload).await?;
    state.bump_sync(RESOURCE);
    Ok(Json(slot))
}

/// DELETE /api/time_slots/:id - 删除时段 (已有订单时拒绝)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let result = time_slot::delete(&state.pool, id).await?;
    if result {
        state.bump_sync(RESOURCE);
    }
    Ok(Json(result))
}
