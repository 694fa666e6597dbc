//! Delivery Order Repository
//!
//! An order and its line items are written in one transaction. Status
//! changes are optimistic: the UPDATE binds the expected current state so a
//! concurrent change surfaces as zero rows instead of silently winning.

use super::{RepoError, RepoResult};
use shared::models::{DeliveryType, Order, OrderItem, OrderStatus, PaymentStatus};
use sqlx::SqlitePool;

/// Fully priced order assembled by checkout, ready to persist
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub delivery_address: String,
    pub delivery_type: DeliveryType,
    pub time_slot_id: Option<i64>,
    pub notes: Option<String>,
    pub subtotal_cents: i64,
    pub delivery_fee_cents: i64,
    pub discount_cents: i64,
    pub promo_code: Option<String>,
    pub total_cents: i64,
    pub items: Vec<LineDraft>,
}

/// Cart line with name and price already snapshotted
#[derive(Debug, Clone)]
pub struct LineDraft {
    pub name: String,
    pub price_cents: i64,
    pub quantity: i64,
}

pub async fn create(pool: &SqlitePool, draft: OrderDraft) -> RepoResult<Order> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();

    let mut tx = pool.begin().await?;
    sqlx::query(
        "INSERT INTO orders (id, customer_name, customer_email, customer_phone, delivery_address, delivery_type, time_slot_id, notes, subtotal_cents, delivery_fee_cents, discount_cents, promo_code, total_cents, status, payment_status, payment_ref, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, 'pending', 'pending', NULL, ?14, ?14)",
    )
    .bind(id)
    .bind(&draft.customer_name)
    .bind(&draft.customer_email)
    .bind(&draft.customer_phone)
    .bind(&draft.delivery_address)
    .bind(draft.delivery_type.as_str())
    .bind(draft.time_slot_id)
    .bind(&draft.notes)
    .bind(draft.subtotal_cents)
    .bind(draft.delivery_fee_cents)
    .bind(draft.discount_cents)
    .bind(&draft.promo_code)
    .bind(draft.total_cents)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    for line in &draft.items {
        sqlx::query(
            "INSERT INTO order_items (id, order_id, name, price_cents, quantity) VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(shared::util::snowflake_id())
        .bind(id)
        .bind(&line.name)
        .bind(line.price_cents)
        .bind(line.quantity)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create order".into()))
}

pub async fn find_all(pool: &SqlitePool, status: Option<OrderStatus>) -> RepoResult<Vec<Order>> {
    let orders = match status {
        Some(status) => {
            sqlx::query_as::<_, Order>(
                "SELECT id, customer_name, customer_email, customer_phone, delivery_address, delivery_type, time_slot_id, notes, subtotal_cents, delivery_fee_cents, discount_cents, promo_code, total_cents, status, payment_status, payment_ref, created_at, updated_at FROM orders WHERE status = ? ORDER BY created_at DESC",
            )
            .bind(status.as_str())
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Order>(
                "SELECT id, customer_name, customer_email, customer_phone, delivery_address, delivery_type, time_slot_id, notes, subtotal_cents, delivery_fee_cents, discount_cents, promo_code, total_cents, status, payment_status, payment_ref, created_at, updated_at FROM orders ORDER BY created_at DESC",
            )
            .fetch_all(pool)
            .await?
        }
    };
    Ok(orders)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(
        "SELECT id, customer_name, customer_email, customer_phone, delivery_address, delivery_type, time_slot_id, notes, subtotal_cents, delivery_fee_cents, discount_cents, promo_code, total_cents, status, payment_status, payment_ref, created_at, updated_at FROM orders WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(order)
}

pub async fn items_for(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<OrderItem>> {
    let items = sqlx::query_as::<_, OrderItem>(
        "SELECT id, order_id, name, price_cents, quantity FROM order_items WHERE order_id = ? ORDER BY id",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(items)
}

/// Move the order status, guarded by the expected current value.
/// Returns false when the row was missing or no longer in `from`.
pub async fn update_status(
    pool: &SqlitePool,
    id: i64,
    from: OrderStatus,
    to: OrderStatus,
) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE orders SET status = ?1, updated_at = ?2 WHERE id = ?3 AND status = ?4")
        .bind(to.as_str())
        .bind(now)
        .bind(id)
        .bind(from.as_str())
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Move the payment status, guarded by the expected current value.
/// The reference is kept unless a new one is supplied.
pub async fn update_payment(
    pool: &SqlitePool,
    id: i64,
    from: PaymentStatus,
    to: PaymentStatus,
    payment_ref: Option<&str>,
) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE orders SET payment_status = ?1, payment_ref = COALESCE(?2, payment_ref), updated_at = ?3 WHERE id = ?4 AND payment_status = ?5",
    )
    .bind(to.as_str())
    .bind(payment_ref)
    .bind(now)
    .bind(id)
    .bind(from.as_str())
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Hard delete; line items go with the order via ON DELETE CASCADE.
/// Callers gate this on terminal status.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM orders WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order {id} not found")));
    }
    Ok(true)
}
