//! Grocery Run Repository
//!
//! A pickup order (grocery run) spans several partner stores. The parent
//! row and its per-store entries are written in one transaction; parent
//! status changes are optimistic, same as delivery orders.

use super::{RepoError, RepoResult};
use shared::models::{PaymentStatus, PickupOrder, PickupOrderStore, PickupStatus, StoreEntryUpdate};
use sqlx::SqlitePool;

/// Fully priced grocery run assembled by checkout
#[derive(Debug, Clone)]
pub struct PickupOrderDraft {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub delivery_address: String,
    pub time_slot_id: Option<i64>,
    pub notes: Option<String>,
    pub estimated_total_cents: i64,
    pub service_charge_cents: i64,
    pub delivery_fee_cents: i64,
    pub convenience_fee_cents: i64,
    pub discount_cents: i64,
    pub promo_code: Option<String>,
    pub total_cents: i64,
    pub stores: Vec<StoreEntryDraft>,
}

/// One store stop with its name snapshotted at checkout
#[derive(Debug, Clone)]
pub struct StoreEntryDraft {
    pub store_id: i64,
    pub store_name: String,
    pub estimated_total_cents: i64,
    pub notes: Option<String>,
}

pub async fn create(pool: &SqlitePool, draft: PickupOrderDraft) -> RepoResult<PickupOrder> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();

    let mut tx = pool.begin().await?;
    sqlx::query(
        "INSERT INTO pickup_orders (id, customer_name, customer_email, customer_phone, delivery_address, time_slot_id, notes, estimated_total_cents, service_charge_cents, delivery_fee_cents, convenience_fee_cents, discount_cents, promo_code, total_cents, status, payment_status, payment_ref, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, 'pending', 'pending', NULL, ?15, ?15)",
    )
    .bind(id)
    .bind(&draft.customer_name)
    .bind(&draft.customer_email)
    .bind(&draft.customer_phone)
    .bind(&draft.delivery_address)
    .bind(draft.time_slot_id)
    .bind(&draft.notes)
    .bind(draft.estimated_total_cents)
    .bind(draft.service_charge_cents)
    .bind(draft.delivery_fee_cents)
    .bind(draft.convenience_fee_cents)
    .bind(draft.discount_cents)
    .bind(&draft.promo_code)
    .bind(draft.total_cents)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    for entry in &draft.stores {
        sqlx::query(
            "INSERT INTO pickup_order_stores (id, pickup_order_id, store_id, store_name, estimated_total_cents, actual_total_cents, notes, status) VALUES (?1, ?2, ?3, ?4, ?5, NULL, ?6, 'pending')",
        )
        .bind(shared::util::snowflake_id())
        .bind(id)
        .bind(entry.store_id)
        .bind(&entry.store_name)
        .bind(entry.estimated_total_cents)
        .bind(&entry.notes)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create pickup order".into()))
}

pub async fn find_all(
    pool: &SqlitePool,
    status: Option<PickupStatus>,
) -> RepoResult<Vec<PickupOrder>> {
    let orders = match status {
        Some(status) => {
            sqlx::query_as::<_, PickupOrder>(
                "SELECT id, customer_name, customer_email, customer_phone, delivery_address, time_slot_id, notes, estimated_total_cents, service_charge_cents, delivery_fee_cents, convenience_fee_cents, discount_cents, promo_code, total_cents, status, payment_status, payment_ref, created_at, updated_at FROM pickup_orders WHERE status = ? ORDER BY created_at DESC",
            )
            .bind(status.as_str())
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, PickupOrder>(
                "SELECT id, customer_name, customer_email, customer_phone, delivery_address, time_slot_id, notes, estimated_total_cents, service_charge_cents, delivery_fee_cents, convenience_fee_cents, discount_cents, promo_code, total_cents, status, payment_status, payment_ref, created_at, updated_at FROM pickup_orders ORDER BY created_at DESC",
            )
            .fetch_all(pool)
            .await?
        }
    };
    Ok(orders)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<PickupOrder>> {
    let order = sqlx::query_as::<_, PickupOrder>(
        "SELECT id, customer_name, customer_email, customer_phone, delivery_address, time_slot_id, notes, estimated_total_cents, service_charge_cents, delivery_fee_cents, convenience_fee_cents, discount_cents, promo_code, total_cents, status, payment_status, payment_ref, created_at, updated_at FROM pickup_orders WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(order)
}

pub async fn stores_for(
    pool: &SqlitePool,
    pickup_order_id: i64,
) -> RepoResult<Vec<PickupOrderStore>> {
    let entries = sqlx::query_as::<_, PickupOrderStore>(
        "SELECT id, pickup_order_id, store_id, store_name, estimated_total_cents, actual_total_cents, notes, status FROM pickup_order_stores WHERE pickup_order_id = ? ORDER BY id",
    )
    .bind(pickup_order_id)
    .fetch_all(pool)
    .await?;
    Ok(entries)
}

pub async fn find_store_entry(
    pool: &SqlitePool,
    pickup_order_id: i64,
    entry_id: i64,
) -> RepoResult<Option<PickupOrderStore>> {
    let entry = sqlx::query_as::<_, PickupOrderStore>(
        "SELECT id, pickup_order_id, store_id, store_name, estimated_total_cents, actual_total_cents, notes, status FROM pickup_order_stores WHERE id = ?1 AND pickup_order_id = ?2",
    )
    .bind(entry_id)
    .bind(pickup_order_id)
    .fetch_optional(pool)
    .await?;
    Ok(entry)
}

/// Move the run status, guarded by the expected current value.
pub async fn update_status(
    pool: &SqlitePool,
    id: i64,
    from: PickupStatus,
    to: PickupStatus,
) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE pickup_orders SET status = ?1, updated_at = ?2 WHERE id = ?3 AND status = ?4",
    )
    .bind(to.as_str())
    .bind(now)
    .bind(id)
    .bind(from.as_str())
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Move the payment status, guarded by the expected current value.
pub async fn update_payment(
    pool: &SqlitePool,
    id: i64,
    from: PaymentStatus,
    to: PaymentStatus,
    payment_ref: Option<&str>,
) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE pickup_orders SET payment_status = ?1, payment_ref = COALESCE(?2, payment_ref), updated_at = ?3 WHERE id = ?4 AND payment_status = ?5",
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

/// Record the shop outcome for one store stop: actual spend, notes,
/// optionally a status move (validated by the caller).
pub async fn update_store_entry(
    pool: &SqlitePool,
    pickup_order_id: i64,
    entry_id: i64,
    data: &StoreEntryUpdate,
) -> RepoResult<PickupOrderStore> {
    if let Some(actual) = data.actual_total_cents
        && actual < 0
    {
        return Err(RepoError::Validation(
            "Actual total must not be negative".into(),
        ));
    }

    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;
    let rows = sqlx::query(
        "UPDATE pickup_order_stores SET actual_total_cents = COALESCE(?1, actual_total_cents), notes = COALESCE(?2, notes), status = COALESCE(?3, status) WHERE id = ?4 AND pickup_order_id = ?5",
    )
    .bind(data.actual_total_cents)
    .bind(&data.notes)
    .bind(data.status.map(|s| s.as_str()))
    .bind(entry_id)
    .bind(pickup_order_id)
    .execute(&mut *tx)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Store entry {entry_id} not found"
        )));
    }
    // Touch the parent so list views sort and sync correctly
    sqlx::query("UPDATE pickup_orders SET updated_at = ?1 WHERE id = ?2")
        .bind(now)
        .bind(pickup_order_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    find_store_entry(pool, pickup_order_id, entry_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Store entry {entry_id} not found")))
}

/// Hard delete; store entries cascade. Callers gate this on terminal status.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM pickup_orders WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Pickup order {id} not found")));
    }
    Ok(true)
}
