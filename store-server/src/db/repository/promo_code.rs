//! Promo Code Repository
//!
//! Redemption is a single conditional UPDATE, same shape as slot booking:
//! the usage cap can never be overshot by concurrent checkouts.

use super::{RepoError, RepoResult};
use shared::models::{DiscountType, PromoCode, PromoCodeCreate, PromoCodeUpdate};
use sqlx::SqlitePool;

/// Codes are stored uppercase; every lookup goes through this.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

fn validate_discount(discount_type: DiscountType, discount_value: i64) -> RepoResult<()> {
    match discount_type {
        DiscountType::Percentage => {
            // Scaled by 100: 10000 = 100.00%
            if discount_value <= 0 || discount_value > 10000 {
                return Err(RepoError::Validation(
                    "Percentage discount must be between 0 and 100".into(),
                ));
            }
        }
        DiscountType::Fixed => {
            if discount_value <= 0 {
                return Err(RepoError::Validation(
                    "Fixed discount must be positive".into(),
                ));
            }
        }
    }
    Ok(())
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<PromoCode>> {
    let codes = sqlx::query_as::<_, PromoCode>(
        "SELECT id, code, description, discount_type, discount_value, minimum_order_cents, max_uses, current_uses, valid_from, valid_until, is_active, created_at, updated_at FROM promo_codes ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(codes)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<PromoCode>> {
    let code = sqlx::query_as::<_, PromoCode>(
        "SELECT id, code, description, discount_type, discount_value, minimum_order_cents, max_uses, current_uses, valid_from, valid_until, is_active, created_at, updated_at FROM promo_codes WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(code)
}

pub async fn find_by_code(pool: &SqlitePool, code: &str) -> RepoResult<Option<PromoCode>> {
    let promo = sqlx::query_as::<_, PromoCode>(
        "SELECT id, code, description, discount_type, discount_value, minimum_order_cents, max_uses, current_uses, valid_from, valid_until, is_active, created_at, updated_at FROM promo_codes WHERE code = ?",
    )
    .bind(normalize_code(code))
    .fetch_optional(pool)
    .await?;
    Ok(promo)
}

pub async fn create(pool: &SqlitePool, data: PromoCodeCreate) -> RepoResult<PromoCode> {
    let code = normalize_code(&data.code);
    if code.is_empty() {
        return Err(RepoError::Validation("Code must not be empty".into()));
    }
    validate_discount(data.discount_type, data.discount_value)?;
    if let Some(min) = data.minimum_order_cents
        && min < 0
    {
        return Err(RepoError::Validation(
            "Minimum order must not be negative".into(),
        ));
    }
    if find_by_code(pool, &code).await?.is_some() {
        return Err(RepoError::Duplicate(format!("Code '{code}' already exists")));
    }

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO promo_codes (id, code, description, discount_type, discount_value, minimum_order_cents, max_uses, current_uses, valid_from, valid_until, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, ?8, ?9, 1, ?10, ?10)",
    )
    .bind(id)
    .bind(&code)
    .bind(&data.description)
    .bind(data.discount_type.as_str())
    .bind(data.discount_value)
    .bind(data.minimum_order_cents.unwrap_or(0))
    .bind(data.max_uses)
    .bind(data.valid_from)
    .bind(data.valid_until)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create promo code".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: PromoCodeUpdate) -> RepoResult<PromoCode> {
    let current = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Promo code {id} not found")))?;

    // Validate the type/value pair as it will land, not just the changed half
    let discount_type = data.discount_type.unwrap_or(current.discount_type);
    let discount_value = data.discount_value.unwrap_or(current.discount_value);
    validate_discount(discount_type, discount_value)?;
    if let Some(min) = data.minimum_order_cents
        && min < 0
    {
        return Err(RepoError::Validation(
            "Minimum order must not be negative".into(),
        ));
    }

    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE promo_codes SET description = COALESCE(?1, description), discount_type = COALESCE(?2, discount_type), discount_value = COALESCE(?3, discount_value), minimum_order_cents = COALESCE(?4, minimum_order_cents), max_uses = COALESCE(?5, max_uses), valid_from = COALESCE(?6, valid_from), valid_until = COALESCE(?7, valid_until), is_active = COALESCE(?8, is_active), updated_at = ?9 WHERE id = ?10",
    )
    .bind(&data.description)
    .bind(data.discount_type.map(|t| t.as_str()))
    .bind(data.discount_value)
    .bind(data.minimum_order_cents)
    .bind(data.max_uses)
    .bind(data.valid_from)
    .bind(data.valid_until)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Promo code {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Promo code {id} not found")))
}

/// Orders keep the code text as a snapshot, so deleting a code never
/// touches order history.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM promo_codes WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Promo code {id} not found")));
    }
    Ok(true)
}

/// Consume one use. The UPDATE re-checks activity, the validity window and
/// the usage cap; `None` means some condition no longer holds and the caller
/// re-reads the row to report which one.
pub async fn redeem(pool: &SqlitePool, id: i64, now_ms: i64) -> RepoResult<Option<i64>> {
    let uses = sqlx::query_scalar::<_, i64>(
        "UPDATE promo_codes SET current_uses = current_uses + 1, updated_at = ?2 WHERE id = ?1 AND is_active = 1 AND valid_from <= ?2 AND (valid_until IS NULL OR valid_until >= ?2) AND (max_uses IS NULL OR current_uses < max_uses) RETURNING current_uses",
    )
    .bind(id)
    .bind(now_ms)
    .fetch_optional(pool)
    .await?;
    Ok(uses)
}
