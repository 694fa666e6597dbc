//! Time Slot Repository
//!
//! Capacity is enforced in SQL: booking is a single conditional UPDATE that
//! only lands while the slot is open, so concurrent checkouts can never
//! oversell a window. 并发安全由数据库原子操作保证。

use super::{RepoError, RepoResult};
use shared::models::{SlotType, TimeSlot, TimeSlotCreate, TimeSlotUpdate};
use sqlx::SqlitePool;

/// Storefront listing: open slots of one kind, today or later
pub async fn find_open(
    pool: &SqlitePool,
    slot_type: SlotType,
    today: &str,
) -> RepoResult<Vec<TimeSlot>> {
    let slots = sqlx::query_as::<_, TimeSlot>(
        "SELECT id, slot_date, start_time, end_time, slot_type, max_orders, current_orders, is_active, created_at FROM time_slots WHERE slot_type = ?1 AND is_active = 1 AND current_orders < max_orders AND slot_date >= ?2 ORDER BY slot_date, start_time",
    )
    .bind(slot_type.as_str())
    .bind(today)
    .fetch_all(pool)
    .await?;
    Ok(slots)
}

/// Back office listing: every slot, optionally filtered by kind
pub async fn find_all_admin(
    pool: &SqlitePool,
    slot_type: Option<SlotType>,
) -> RepoResult<Vec<TimeSlot>> {
    let slots = match slot_type {
        Some(kind) => {
            sqlx::query_as::<_, TimeSlot>(
                "SELECT id, slot_date, start_time, end_time, slot_type, max_orders, current_orders, is_active, created_at FROM time_slots WHERE slot_type = ? ORDER BY slot_date, start_time",
            )
            .bind(kind.as_str())
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, TimeSlot>(
                "SELECT id, slot_date, start_time, end_time, slot_type, max_orders, current_orders, is_active, created_at FROM time_slots ORDER BY slot_date, start_time",
            )
            .fetch_all(pool)
            .await?
        }
    };
    Ok(slots)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<TimeSlot>> {
    let slot = sqlx::query_as::<_, TimeSlot>(
        "SELECT id, slot_date, start_time, end_time, slot_type, max_orders, current_orders, is_active, created_at FROM time_slots WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(slot)
}

async fn find_conflict(
    pool: &SqlitePool,
    slot_date: &str,
    start_time: &str,
    end_time: &str,
    slot_type: SlotType,
) -> RepoResult<Option<TimeSlot>> {
    let slot = sqlx::query_as::<_, TimeSlot>(
        "SELECT id, slot_date, start_time, end_time, slot_type, max_orders, current_orders, is_active, created_at FROM time_slots WHERE slot_date = ?1 AND start_time = ?2 AND end_time = ?3 AND slot_type = ?4",
    )
    .bind(slot_date)
    .bind(start_time)
    .bind(end_time)
    .bind(slot_type.as_str())
    .fetch_optional(pool)
    .await?;
    Ok(slot)
}

pub async fn create(pool: &SqlitePool, data: TimeSlotCreate) -> RepoResult<TimeSlot> {
    if data.max_orders <= 0 {
        return Err(RepoError::Validation("Max orders must be positive".into()));
    }
    if find_conflict(
        pool,
        &data.slot_date,
        &data.start_time,
        &data.end_time,
        data.slot_type,
    )
    .await?
    .is_some()
    {
        return Err(RepoError::Duplicate(format!(
            "Slot {} {}-{} already exists",
            data.slot_date, data.start_time, data.end_time
        )));
    }

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO time_slots (id, slot_date, start_time, end_time, slot_type, max_orders, current_orders, is_active, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, 1, ?7)",
    )
    .bind(id)
    .bind(&data.slot_date)
    .bind(&data.start_time)
    .bind(&data.end_time)
    .bind(data.slot_type.as_str())
    .bind(data.max_orders)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create time slot".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: TimeSlotUpdate) -> RepoResult<TimeSlot> {
    if let Some(max) = data.max_orders
        && max <= 0
    {
        return Err(RepoError::Validation("Max orders must be positive".into()));
    }

    let current = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Time slot {id} not found")))?;

    // Date/time edits must not collide with another slot of the same kind
    let slot_date = data.slot_date.as_deref().unwrap_or(&current.slot_date);
    let start_time = data.start_time.as_deref().unwrap_or(&current.start_time);
    let end_time = data.end_time.as_deref().unwrap_or(&current.end_time);
    if let Some(existing) =
        find_conflict(pool, slot_date, start_time, end_time, current.slot_type).await?
        && existing.id != id
    {
        return Err(RepoError::Duplicate(format!(
            "Slot {slot_date} {start_time}-{end_time} already exists"
        )));
    }

    let rows = sqlx::query(
        "UPDATE time_slots SET slot_date = COALESCE(?1, slot_date), start_time = COALESCE(?2, start_time), end_time = COALESCE(?3, end_time), max_orders = COALESCE(?4, max_orders), is_active = COALESCE(?5, is_active) WHERE id = ?6",
    )
    .bind(&data.slot_date)
    .bind(&data.start_time)
    .bind(&data.end_time)
    .bind(data.max_orders)
    .bind(data.is_active)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Time slot {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Time slot {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let order_refs =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders WHERE time_slot_id = ?")
            .bind(id)
            .fetch_one(pool)
            .await?;
    let pickup_refs =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM pickup_orders WHERE time_slot_id = ?")
            .bind(id)
            .fetch_one(pool)
            .await?;
    if order_refs + pickup_refs > 0 {
        return Err(RepoError::Validation(
            "Cannot delete time slot with orders".into(),
        ));
    }

    let rows = sqlx::query("DELETE FROM time_slots WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Time slot {id} not found")));
    }
    Ok(true)
}

/// Claim one unit of capacity. The UPDATE carries the full openness
/// predicate; `None` means the slot was missing or not open, and the caller
/// re-reads the row to report which condition failed.
pub async fn book(pool: &SqlitePool, id: i64, today: &str) -> RepoResult<Option<i32>> {
    let taken = sqlx::query_scalar::<_, i32>(
        "UPDATE time_slots SET current_orders = current_orders + 1 WHERE id = ?1 AND is_active = 1 AND current_orders < max_orders AND slot_date >= ?2 RETURNING current_orders",
    )
    .bind(id)
    .bind(today)
    .fetch_optional(pool)
    .await?;
    Ok(taken)
}

/// Return one unit of capacity, clamped at zero. Missing ids are ignored;
/// cancellation must not fail because a slot was deleted in the meantime.
pub async fn release(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    sqlx::query("UPDATE time_slots SET current_orders = MAX(current_orders - 1, 0) WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
