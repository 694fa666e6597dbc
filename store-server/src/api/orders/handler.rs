//! Order API Handlers
//!
//! 状态机校验在模型层, 这里负责 compare-and-swap 落库和取消时的时段回收。

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::checkout;
use crate::core::ServerState;
use crate::db::repository::{bill, order, order_message};
use crate::scheduling;
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{
    MessageSender, Order, OrderBill, OrderBillCreate, OrderCreate, OrderDetail, OrderKind,
    OrderMessage, OrderMessageCreate, OrderStatus, OrderStatusUpdate, PaymentUpdate,
};

fn order_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::OrderNotFound, format!("Order {} not found", id))
}

/// Query params for the back-office order list
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<OrderStatus>,
}

/// POST /api/orders - 顾客下单
///
/// 校验、定价、优惠码核销和时段占用都在结账事务里完成。
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<Order>> {
    let order = checkout::place_order(&state.pool, payload).await?;
    tracing::info!(
        order_id = order.id,
        total_cents = order.total_cents,
        "Order placed"
    );
    Ok(Json(order))
}

/// GET /api/orders - 后台订单列表, 可按状态过滤
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = order::find_all(&state.pool, query.status).await?;
    Ok(Json(orders))
}

/// GET /api/orders/:id - 订单详情 (行项目 + 留言 + 账单)
///
/// 顾客凭单号跟踪配送进度, 后台用同一接口。
pub async fn get_detail(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderDetail>> {
    let order = order::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| order_not_found(id))?;
    let items = order::items_for(&state.pool, id).await?;
    let messages = order_message::list_for(&state.pool, OrderKind::Delivery, id).await?;
    let bills = bill::list_for(&state.pool, OrderKind::Delivery, id).await?;
    Ok(Json(OrderDetail {
        order,
        items,
        messages,
        bills,
    }))
}

/// PUT /api/orders/:id/status - 推进订单状态
///
/// 取消预约单时把占用的时段名额还回去。
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<Json<Order>> {
    let current = order::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| order_not_found(id))?;
    let to = payload.status;
    if !current.status.can_transition_to(to) {
        return Err(AppError::with_message(
            ErrorCode::OrderInvalidTransition,
            format!("Cannot move order from {} to {}", current.status, to),
        ));
    }

    // 带上读到的旧状态做条件更新, 并发推进时只有一个能成功
    let moved = order::update_status(&state.pool, id, current.status, to).await?;
    if !moved {
        return Err(AppError::conflict("Order status changed, please retry"));
    }

    if to == OrderStatus::Cancelled
        && let Some(slot_id) = current.time_slot_id
    {
        scheduling::release_slot(&state.pool, slot_id).await?;
    }

    tracing::info!(order_id = id, from = %current.status, to = %to, "Order status updated");
    let updated = order::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| order_not_found(id))?;
    Ok(Json(updated))
}

/// POST/PUT /api/orders/:id/payment - 支付状态变更
///
/// POST 是支付网关回调的落点, PUT 给后台人工对账, 请求体相同。
pub async fn update_payment(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<PaymentUpdate>,
) -> AppResult<Json<Order>> {
    let current = order::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| order_not_found(id))?;
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

    let moved = order::update_payment(
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

    tracing::info!(order_id = id, from = %current.payment_status, to = %to, "Payment status updated");
    let updated = order::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| order_not_found(id))?;
    Ok(Json(updated))
}

/// GET /api/orders/:id/messages - 订单留言线程
pub async fn list_messages(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<OrderMessage>>> {
    order::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| order_not_found(id))?;
    let messages = order_message::list_for(&state.pool, OrderKind::Delivery, id).await?;
    Ok(Json(messages))
}

/// POST /api/orders/:id/messages - 发留言
///
/// 未登录的发送者一律记为顾客, 不能冒充后台。
pub async fn post_message(
    State(state): State<ServerState>,
    current: Option<Extension<CurrentUser>>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderMessageCreate>,
) -> AppResult<Json<OrderMessage>> {
    order::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| order_not_found(id))?;
    let sender = if current.is_some() {
        payload.sender
    } else {
        MessageSender::Customer
    };
    let message =
        order_message::create(&state.pool, OrderKind::Delivery, id, sender, &payload.message)
            .await?;
    Ok(Json(message))
}

/// GET /api/orders/:id/bills - 采购账单列表
pub async fn list_bills(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<OrderBill>>> {
    order::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| order_not_found(id))?;
    let bills = bill::list_for(&state.pool, OrderKind::Delivery, id).await?;
    Ok(Json(bills))
}

/// POST /api/orders/:id/bills - 登记账单 (行项目 + 小票图)
pub async fn post_bill(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderBillCreate>,
) -> AppResult<Json<OrderBill>> {
    order::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| order_not_found(id))?;
    let created = bill::create(&state.pool, OrderKind::Delivery, id, &payload).await?;
    Ok(Json(created))
}

/// DELETE /api/orders/:id - 删除已完结订单
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let current = order::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| order_not_found(id))?;
    if !current.status.is_terminal() {
        return Err(AppError::with_message(
            ErrorCode::OrderNotTerminal,
            "Only delivered or cancelled orders can be deleted",
        ));
    }
    let removed = order::delete(&state.pool, id).await?;
    tracing::info!(order_id = id, "Order deleted");
    Ok(Json(removed))
}
