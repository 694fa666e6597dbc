//! Pickup Order API Handlers
//!
//! 与配送订单同构: 状态机校验在模型层, 落库用 compare-and-swap。
//! 额外多一层 per-store 条目, 代购员按店回填实际消费。

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::checkout;
use crate::core::ServerState;
use crate::db::repository::{bill, order_message, pickup_order};
use crate::scheduling;
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{
    MessageSender, OrderBill, OrderBillCreate, OrderKind, OrderMessage, OrderMessageCreate,
    PaymentUpdate, PickupOrder, PickupOrderCreate, PickupOrderDetail, PickupOrderStore,
    PickupStatus, PickupStatusUpdate, StoreEntryUpdate,
};

fn run_not_found(id: i64) -> AppError {
    AppError::with_message(
        ErrorCode::PickupOrderNotFound,
        format!("Pickup order {} not found", id),
    )
}

/// Query params for the back-office run list
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<PickupStatus>,
}

/// POST /api/pickup_orders - 顾客提交代购单
///
/// 店铺校验、最低消费、费用计算和时段占用都在结账事务里完成。
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<PickupOrderCreate>,
) -> AppResult<Json<PickupOrder>> {
    let run = checkout::place_pickup_order(&state.pool, payload).await?;
    tracing::info!(
        pickup_order_id = run.id,
        total_cents = run.total_cents,
        "Pickup order placed"
    );
    Ok(Json(run))
}

/// GET /api/pickup_orders - 后台代购单列表, 可按状态过滤
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<PickupOrder>>> {
    let runs = pickup_order::find_all(&state.pool, query.status).await?;
    Ok(Json(runs))
}

/// GET /api/pickup_orders/:id - 代购单详情 (店铺条目 + 留言 + 账单)
pub async fn get_detail(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<PickupOrderDetail>> {
    let order = pickup_order::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| run_not_found(id))?;
    let stores = pickup_order::stores_for(&state.pool, id).await?;
    let messages = order_message::list_for(&state.pool, OrderKind::Pickup, id).await?;
    let bills = bill::list_for(&state.pool, OrderKind::Pickup, id).await?;
    Ok(Json(PickupOrderDetail {
        order,
        stores,
        messages,
        bills,
    }))
}

/// PUT /api/pickup_orders/:id/status - 推进代购单状态
///
/// 取消时把占用的自取时段名额还回去。
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<PickupStatusUpdate>,
) -> AppResult<Json<PickupOrder>> {
    let current = pickup_order::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| run_not_found(id))?;
    let to = payload.status;
    if !current.status.can_transition_to(to) {
        return Err(AppError::with_message(
            ErrorCode::OrderInvalidTransition,
            format!("Cannot move pickup order from {} to {}", current.status, to),
        ));
    }

    // 带上读到的旧状态做条件更新, 并发推进时只有一个能成功
    let moved = pickup_order::update_status(&state.pool, id, current.status, to).await?;
    if !moved {
        return Err(AppError::conflict("Pickup order status changed, please retry"));
    }

    if to == PickupStatus::Cancelled
        && let Some(slot_id) = current.time_slot_id
    {
        scheduling::release_slot(&state.pool, slot_id).await?;
    }

    tracing::info!(pickup_order_id = id, from = %current.status, to = %to, "Pickup order status updated");
    let updated = pickup_order::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| run_not_found(id))?;
    Ok(Json(updated))
}

/// POST/PUT /api/pickup_orders/:id/payment - 支付状态变更
///
/// POST 是支付网关回调的落点, PUT 给后台人工对账, 请求体相同。
pub async fn update_payment(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<PaymentUpdate>,
) -> AppResult<Json<PickupOrder>> {
    let current = pickup_order::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| run_not_found(id))?;
    let to = payload.payment_status;
    if !current.payment_status.can_transition_to(to) {
        return Err(AppError::with_message(
            ErrorCode::PaymentInvalidTransition,
            format!(
                "Cannot move payment from {} to {}",
                current.payment_status, to
            ),
        ));
    }

    let moved = pickup_order::update_payment(
        &state.pool,
        id,
        current.payment_status,
        to,
        payload.payment_ref.as_deref(),
    )
    .await?;
    if !moved {
        return Err(AppError::conflict("Payment status changed, please retry"));
    }

    tracing::info!(pickup_order_id = id, from = %current.payment_status, to = %to, "Payment status updated");
    let updated = pickup_order::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| run_not_found(id))?;
    Ok(Json(updated))
}

/// PATCH /api/pickup_orders/:id/stores/:entry_id - 回填单店采买结果
///
/// 实付金额、备注与条目状态都可选, 只动传了的字段。
pub async fn update_store_entry(
    State(state): State<ServerState>,
    Path((id, entry_id)): Path<(i64, i64)>,
    Json(payload): Json<StoreEntryUpdate>,
) -> AppResult<Json<PickupOrderStore>> {
    pickup_order::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| run_not_found(id))?;
    let entry = pickup_order::find_store_entry(&state.pool, id, entry_id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::RunStoreEntryNotFound,
                format!("Store entry {} not found on pickup order {}", entry_id, id),
            )
        })?;

    if let Some(next) = payload.status
        && !entry.status.can_transition_to(next)
    {
        return Err(AppError::with_message(
            ErrorCode::OrderInvalidTransition,
            format!("Cannot move store entry from {} to {}", entry.status, next),
        ));
    }

    let updated = pickup_order::update_store_entry(&state.pool, id, entry_id, &payload).await?;
    tracing::info!(
        pickup_order_id = id,
        entry_id = entry_id,
        "Store entry updated"
    );
    Ok(Json(updated))
}

/// GET /api/pickup_orders/:id/messages - 代购单留言线程
pub async fn list_messages(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<OrderMessage>>> {
    pickup_order::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| run_not_found(id))?;
    let messages = order_message::list_for(&state.pool, OrderKind::Pickup, id).await?;
    Ok(Json(messages))
}

/// POST /api/pickup_orders/:id/messages - 发留言
///
/// 未登录的发送者一律记为顾客, 不能冒充后台。
pub async fn post_message(
    State(state): State<ServerState>,
    current: Option<Extension<CurrentUser>>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderMessageCreate>,
) -> AppResult<Json<OrderMessage>> {
    pickup_order::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| run_not_found(id))?;
    let sender = if current.is_some() {
        payload.sender
    } else {
        MessageSender::Customer
    };
    let message =
        order_message::create(&state.pool, OrderKind::Pickup, id, sender, &payload.message).await?;
    Ok(Json(message))
}

/// GET /api/pickup_orders/:id/bills - 采购账单列表
pub async fn list_bills(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<OrderBill>>> {
    pickup_order::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| run_not_found(id))?;
    let bills = bill::list_for(&state.pool, OrderKind::Pickup, id).await?;
    Ok(Json(bills))
}

/// POST /api/pickup_orders/:id/bills - 登记单店账单 (行项目 + 小票图)
pub async fn post_bill(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderBillCreate>,
) -> AppResult<Json<OrderBill>> {
    pickup_order::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| run_not_found(id))?;
    let created = bill::create(&state.pool, OrderKind::Pickup, id, &payload).await?;
    Ok(Json(created))
}

/// DELETE /api/pickup_orders/:id - 删除已完结代购单
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let current = pickup_order::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| run_not_found(id))?;
    if !current.status.is_terminal() {
        return Err(AppError::with_message(
            ErrorCode::OrderNotTerminal,
            "Only completed or cancelled pickup orders can be deleted",
        ));
    }
    let removed = pickup_order::delete(&state.pool, id).await?;
    tracing::info!(pickup_order_id = id, "Pickup order deleted");
    Ok(Json(removed))
}
