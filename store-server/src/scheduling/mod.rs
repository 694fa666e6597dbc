//! Time Slot Scheduling
//!
//! Wraps the slot repository with the rules the storefront relies on:
//! well-formed slot definitions, type-checked booking, and the precise
//! error when a booking loses the race for the last place.

use chrono_tz::Tz;
use sqlx::SqlitePool;

use crate::db::repository::time_slot;
use crate::utils::time;
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{
    BulkCreateFailure, BulkCreateResult, SlotType, TimeSlot, TimeSlotBulkCreate, TimeSlotCreate,
    TimeSlotUpdate,
};

/// Reject malformed dates and inverted time ranges before they reach the
/// database.
fn validate_definition(slot_date: &str, start_time: &str, end_time: &str) -> AppResult<()> {
    time::parse_date(slot_date)?;
    if !time::is_end_after_start(start_time, end_time)? {
        return Err(AppError::new(ErrorCode::SlotInvalidTimeRange));
    }
    Ok(())
}

pub async fn create_slot(pool: &SqlitePool, data: TimeSlotCreate) -> AppResult<TimeSlot> {
    validate_definition(&data.slot_date, &data.start_time, &data.end_time)?;
    Ok(time_slot::create(pool, data).await?)
}

/// Create one slot per date with a shared window. Dates fail
/// independently: earlier successes stay committed and each bad date
/// reports its own reason.
pub async fn bulk_create(pool: &SqlitePool, data: TimeSlotBulkCreate) -> AppResult<BulkCreateResult> {
    if !time::is_end_after_start(&data.start_time, &data.end_time)? {
        return Err(AppError::new(ErrorCode::SlotInvalidTimeRange));
    }

    let mut created = Vec::new();
    let mut failed = Vec::new();
    for date in &data.dates {
        if let Err(e) = time::parse_date(date) {
            failed.push(BulkCreateFailure {
                date: date.clone(),
                reason: e.message,
            });
            continue;
        }
        let slot = TimeSlotCreate {
            slot_date: date.clone(),
            start_time: data.start_time.clone(),
            end_time: data.end_time.clone(),
            slot_type: data.slot_type,
            max_orders: data.max_orders,
        };
        match time_slot::create(pool, slot).await {
            Ok(slot) => created.push(slot),
            Err(e) => failed.push(BulkCreateFailure {
                date: date.clone(),
                reason: e.to_string(),
            }),
        }
    }
    Ok(BulkCreateResult { created, failed })
}

pub async fn update_slot(pool: &SqlitePool, id: i64, data: TimeSlotUpdate) -> AppResult<TimeSlot> {
    let current = time_slot::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::SlotNotFound))?;
    let slot_date = data.slot_date.as_deref().unwrap_or(&current.slot_date);
    let start_time = data.start_time.as_deref().unwrap_or(&current.start_time);
    let end_time = data.end_time.as_deref().unwrap_or(&current.end_time);
    validate_definition(slot_date, start_time, end_time)?;

    Ok(time_slot::update(pool, id, data).await?)
}

/// Claim a place in a slot for an order being checked out.
///
/// The slot must be of the kind the order claims (a delivery order cannot
/// book a pickup window). Capacity itself is enforced by the conditional
/// UPDATE; on a miss the row is re-read to name the failed condition.
pub async fn book_slot(
    pool: &SqlitePool,
    slot_id: i64,
    expected: SlotType,
    tz: Tz,
) -> AppResult<()> {
    let today = time::today_in_zone(tz);
    let slot = time_slot::find_by_id(pool, slot_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::SlotNotFound))?;
    if slot.slot_type != expected {
        return Err(AppError::new(ErrorCode::SlotWrongType));
    }

    if time_slot::book(pool, slot_id, &today).await?.is_some() {
        return Ok(());
    }
    let current = time_slot::find_by_id(pool, slot_id).await?;
    Err(diagnose_booking_failure(current.as_ref(), &today))
}

/// Give back a booked place, used when an order is cancelled or checkout
/// fails after booking.
pub async fn release_slot(pool: &SqlitePool, slot_id: i64) -> AppResult<()> {
    Ok(time_slot::release(pool, slot_id).await?)
}

/// Name the condition that made the booking UPDATE miss.
fn diagnose_booking_failure(slot: Option<&TimeSlot>, today: &str) -> AppError {
    match slot {
        None => AppError::new(ErrorCode::SlotNotFound),
        Some(s) if !s.is_active => AppError::new(ErrorCode::SlotInactive),
        Some(s) if s.slot_date.as_str() < today => AppError::new(ErrorCode::SlotDateInPast),
        Some(s) if s.current_orders >= s.max_orders => AppError::new(ErrorCode::SlotFull),
        Some(_) => AppError::conflict("Time slot state changed, please retry"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(date: &str, current: i32, max: i32, active: bool) -> TimeSlot {
        TimeSlot {
            id: 1,
            slot_date: date.to_string(),
            start_time: "09:00".to_string(),
            end_time: "11:00".to_string(),
            slot_type: SlotType::Delivery,
            max_orders: max,
            current_orders: current,
            is_active: active,
            created_at: 0,
        }
    }

    #[test]
    fn test_validate_definition() {
        assert!(validate_definition("2025-06-01", "09:00", "11:00").is_ok());
        assert_eq!(
            validate_definition("2025-06-01", "11:00", "09:00")
                .unwrap_err()
                .code,
            ErrorCode::SlotInvalidTimeRange
        );
        assert_eq!(
            validate_definition("2025-06-01", "09:00", "09:00")
                .unwrap_err()
                .code,
            ErrorCode::SlotInvalidTimeRange
        );
        assert!(validate_definition("June 1st", "09:00", "11:00").is_err());
    }

    #[test]
    fn test_diagnose_missing_slot() {
        assert_eq!(
            diagnose_booking_failure(None, "2025-06-01").code,
            ErrorCode::SlotNotFound
        );
    }

    #[test]
    fn test_diagnose_inactive_before_capacity() {
        // A disabled slot that is also full reports inactive
        let s = slot("2025-06-02", 5, 5, false);
        assert_eq!(
            diagnose_booking_failure(Some(&s), "2025-06-01").code,
            ErrorCode::SlotInactive
        );
    }

    #[test]
    fn test_diagnose_past_date() {
        let s = slot("2025-05-30", 0, 5, true);
        assert_eq!(
            diagnose_booking_failure(Some(&s), "2025-06-01").code,
            ErrorCode::SlotDateInPast
        );
    }

    #[test]
    fn test_diagnose_full() {
        let s = slot("2025-06-02", 5, 5, true);
        assert_eq!(
            diagnose_booking_failure(Some(&s), "2025-06-01").code,
            ErrorCode::SlotFull
        );
    }

    fn zone() -> Tz {
        "Australia/Adelaide".parse().unwrap()
    }

    async fn seed(pool: &SqlitePool, max_orders: i32) -> TimeSlot {
        create_slot(
            pool,
            TimeSlotCreate {
                slot_date: "2099-06-01".to_string(),
                start_time: "09:00".to_string(),
                end_time: "11:00".to_string(),
                slot_type: SlotType::Delivery,
                max_orders,
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_capacity_one_admits_exactly_one() {
        let pool = crate::db::test_pool().await;
        let s = seed(&pool, 1).await;

        book_slot(&pool, s.id, SlotType::Delivery, zone())
            .await
            .unwrap();
        let err = book_slot(&pool, s.id, SlotType::Delivery, zone())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::SlotFull);

        let full = time_slot::find_by_id(&pool, s.id).await.unwrap().unwrap();
        assert_eq!(full.current_orders, 1);
    }

    #[tokio::test]
    async fn test_release_returns_the_place() {
        let pool = crate::db::test_pool().await;
        let s = seed(&pool, 1).await;

        book_slot(&pool, s.id, SlotType::Delivery, zone())
            .await
            .unwrap();
        release_slot(&pool, s.id).await.unwrap();

        // The freed place is bookable again
        book_slot(&pool, s.id, SlotType::Delivery, zone())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_release_floors_at_zero() {
        let pool = crate::db::test_pool().await;
        let s = seed(&pool, 1).await;

        release_slot(&pool, s.id).await.unwrap();
        let untouched = time_slot::find_by_id(&pool, s.id).await.unwrap().unwrap();
        assert_eq!(untouched.current_orders, 0);
    }

    #[tokio::test]
    async fn test_booking_past_date_rejected() {
        let pool = crate::db::test_pool().await;
        let past = create_slot(
            &pool,
            TimeSlotCreate {
                slot_date: "2001-06-01".to_string(),
                start_time: "09:00".to_string(),
                end_time: "11:00".to_string(),
                slot_type: SlotType::Delivery,
                max_orders: 5,
            },
        )
        .await
        .unwrap();

        let err = book_slot(&pool, past.id, SlotType::Delivery, zone())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::SlotDateInPast);
    }
}
