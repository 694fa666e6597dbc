//! Promo Code Validation and Redemption
//!
//! Validation is a pure function over the promo row so checkout and the
//! storefront's validate endpoint agree exactly. Redemption pairs it with
//! the repository's conditional UPDATE; when the UPDATE misses, the row is
//! re-read and re-validated to report which condition failed.

use sqlx::SqlitePool;

use crate::db::repository::promo_code;
use crate::pricing::percentage_of;
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{AppliedPromo, DiscountType, PromoCode};

/// Check a promo row against a subtotal at a point in time.
///
/// Inactive codes are reported as not found so the storefront cannot
/// probe which codes exist.
pub fn validate(promo: &PromoCode, subtotal_cents: i64, now_ms: i64) -> AppResult<AppliedPromo> {
    if !promo.is_active {
        return Err(AppError::new(ErrorCode::PromoNotFound));
    }
    if now_ms < promo.valid_from {
        return Err(AppError::new(ErrorCode::PromoNotYetActive));
    }
    if let Some(until) = promo.valid_until
        && now_ms > until
    {
        return Err(AppError::new(ErrorCode::PromoExpired));
    }
    if let Some(max) = promo.max_uses
        && promo.current_uses >= max
    {
        return Err(AppError::new(ErrorCode::PromoLimitReached));
    }
    if subtotal_cents < promo.minimum_order_cents {
        return Err(
            AppError::new(ErrorCode::PromoMinimumNotMet)
                .with_detail("minimum_order_cents", promo.minimum_order_cents),
        );
    }

    let discount_amount_cents = match promo.discount_type {
        DiscountType::Percentage => percentage_of(subtotal_cents, promo.discount_value),
        // Fixed values are scaled by 100 in dollars, which is exactly cents
        DiscountType::Fixed => promo.discount_value,
    }
    .min(subtotal_cents);

    Ok(AppliedPromo {
        code: promo.code.clone(),
        description: promo.description.clone(),
        discount_type: promo.discount_type,
        discount_value: promo.discount_value,
        discount_amount_cents,
    })
}

/// Storefront validation: look up the code and run the checks without
/// consuming a use.
pub async fn validate_code(
    pool: &SqlitePool,
    code: &str,
    subtotal_cents: i64,
) -> AppResult<AppliedPromo> {
    let promo = promo_code::find_by_code(pool, code)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::PromoNotFound))?;
    validate(&promo, subtotal_cents, shared::util::now_millis())
}

/// Consume one use during checkout.
///
/// The conditional UPDATE is the authority; validation beforehand gives
/// precise errors on the common path, re-validation afterwards explains a
/// lost race.
pub async fn redeem(pool: &SqlitePool, code: &str, subtotal_cents: i64) -> AppResult<AppliedPromo> {
    let now_ms = shared::util::now_millis();
    let promo = promo_code::find_by_code(pool, code)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::PromoNotFound))?;
    let applied = validate(&promo, subtotal_cents, now_ms)?;

    let uses = promo_code::redeem(pool, promo.id, now_ms).await?;
    if uses.is_some() {
        return Ok(applied);
    }

    // The UPDATE missed: someone consumed the last use, flipped the code
    // inactive or deleted it between our read and write.
    match promo_code::find_by_code(pool, code).await? {
        None => Err(AppError::new(ErrorCode::PromoNotFound)),
        Some(current) => {
            validate(&current, subtotal_cents, shared::util::now_millis())?;
            Err(AppError::conflict("Promo code state changed, please retry"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn promo() -> PromoCode {
        PromoCode {
            id: 1,
            code: "SAVE10".to_string(),
            description: Some("10% off".to_string()),
            discount_type: DiscountType::Percentage,
            discount_value: 1000,
            minimum_order_cents: 0,
            max_uses: None,
            current_uses: 0,
            valid_from: 1_000,
            valid_until: None,
            is_active: true,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn code_of(err: AppError) -> ErrorCode {
        err.code
    }

    #[test]
    fn test_percentage_discount_applied() {
        let applied = validate(&promo(), 2599, 2_000).unwrap();
        assert_eq!(applied.discount_amount_cents, 260);
        assert_eq!(applied.code, "SAVE10");
    }

    #[test]
    fn test_fixed_discount_is_cents() {
        let mut p = promo();
        p.discount_type = DiscountType::Fixed;
        p.discount_value = 1000; // $10.00

        let applied = validate(&p, 2599, 2_000).unwrap();
        assert_eq!(applied.discount_amount_cents, 1000);
    }

    #[test]
    fn test_discount_clamped_to_subtotal() {
        let mut p = promo();
        p.discount_type = DiscountType::Fixed;
        p.discount_value = 5000; // $50 off a $20 order

        let applied = validate(&p, 2000, 2_000).unwrap();
        assert_eq!(applied.discount_amount_cents, 2000);
    }

    #[test]
    fn test_inactive_reads_as_not_found() {
        let mut p = promo();
        p.is_active = false;
        assert_eq!(
            code_of(validate(&p, 2599, 2_000).unwrap_err()),
            ErrorCode::PromoNotFound
        );
    }

    #[test]
    fn test_validity_window() {
        let p = promo();
        assert_eq!(
            code_of(validate(&p, 2599, 500).unwrap_err()),
            ErrorCode::PromoNotYetActive
        );

        let mut p = promo();
        p.valid_until = Some(3_000);
        assert!(validate(&p, 2599, 3_000).is_ok());
        assert_eq!(
            code_of(validate(&p, 2599, 3_001).unwrap_err()),
            ErrorCode::PromoExpired
        );
    }

    #[test]
    fn test_usage_limit() {
        let mut p = promo();
        p.max_uses = Some(5);
        p.current_uses = 5;
        assert_eq!(
            code_of(validate(&p, 2599, 2_000).unwrap_err()),
            ErrorCode::PromoLimitReached
        );

        p.current_uses = 4;
        assert!(validate(&p, 2599, 2_000).is_ok());
    }

    #[test]
    fn test_minimum_order() {
        let mut p = promo();
        p.minimum_order_cents = 3000;
        assert_eq!(
            code_of(validate(&p, 2999, 2_000).unwrap_err()),
            ErrorCode::PromoMinimumNotMet
        );
        assert!(validate(&p, 3000, 2_000).is_ok());
    }

    #[test]
    fn test_expiry_checked_before_usage_and_minimum() {
        // An expired code with every other problem still reports expired
        let mut p = promo();
        p.valid_until = Some(1_500);
        p.max_uses = Some(1);
        p.current_uses = 1;
        p.minimum_order_cents = 10_000;
        assert_eq!(
            code_of(validate(&p, 100, 2_000).unwrap_err()),
            ErrorCode::PromoExpired
        );
    }
}
