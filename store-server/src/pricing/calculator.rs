//! Checkout Fee and Total Calculation
//!
//! Delivery orders: subtotal - discount + delivery fee.
//! Grocery runs: estimated total + 12% service charge + the highest
//! per-store delivery fee + flat convenience fee - discount.

use shared::models::{DeliverySettings, DeliveryType};

use super::money::percentage_of;

/// Service charge on grocery runs, percent scaled by 100 (1200 = 12.00%)
pub const SERVICE_CHARGE_PERCENT: i64 = 1200;

/// Minimum estimated total for a single-store grocery run, in cents
pub const RUN_BASE_MINIMUM_CENTS: i64 = 5000;

/// Additional minimum per extra store, in cents
pub const RUN_STORE_MINIMUM_CENTS: i64 = 2500;

/// Flat delivery fee for the chosen delivery type
pub fn delivery_fee_for(delivery_type: DeliveryType, settings: &DeliverySettings) -> i64 {
    match delivery_type {
        DeliveryType::Express => settings.express_fee_cents,
        DeliveryType::Scheduled => settings.scheduled_fee_cents,
        DeliveryType::Late => settings.late_fee_cents,
    }
}

/// Minimum estimated total for a run of `store_count` stores:
/// $50 for the first store, $25 for each one after it.
pub fn run_minimum_cents(store_count: usize) -> i64 {
    if store_count == 0 {
        return 0;
    }
    RUN_BASE_MINIMUM_CENTS + RUN_STORE_MINIMUM_CENTS * (store_count as i64 - 1)
}

/// Service charge on the estimated shop total
pub fn service_charge_cents(estimated_total_cents: i64) -> i64 {
    percentage_of(estimated_total_cents, SERVICE_CHARGE_PERCENT)
}

/// The run is delivered in one trip; charge the single highest store fee.
pub fn run_delivery_fee_cents(fees: impl IntoIterator<Item = i64>) -> i64 {
    fees.into_iter().max().unwrap_or(0)
}

/// Delivery order total. The discount is already clamped to the subtotal,
/// so the result is never below the delivery fee.
pub fn order_total_cents(subtotal_cents: i64, discount_cents: i64, delivery_fee_cents: i64) -> i64 {
    (subtotal_cents - discount_cents).max(0) + delivery_fee_cents
}

/// Grocery run total
pub fn run_total_cents(
    estimated_total_cents: i64,
    service_charge_cents: i64,
    delivery_fee_cents: i64,
    convenience_fee_cents: i64,
    discount_cents: i64,
) -> i64 {
    (estimated_total_cents - discount_cents).max(0)
        + service_charge_cents
        + delivery_fee_cents
        + convenience_fee_cents
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> DeliverySettings {
        DeliverySettings {
            id: 1,
            express_fee_cents: 999,
            scheduled_fee_cents: 599,
            late_fee_cents: 1499,
            convenience_fee_cents: 200,
            timezone: "Australia/Adelaide".to_string(),
            estimated_delivery_minutes: 60,
            updated_at: 0,
        }
    }

    #[test]
    fn test_delivery_fee_per_type() {
        let s = settings();
        assert_eq!(delivery_fee_for(DeliveryType::Express, &s), 999);
        assert_eq!(delivery_fee_for(DeliveryType::Scheduled, &s), 599);
        assert_eq!(delivery_fee_for(DeliveryType::Late, &s), 1499);
    }

    #[test]
    fn test_run_minimum_scales_with_store_count() {
        assert_eq!(run_minimum_cents(1), 5000);
        assert_eq!(run_minimum_cents(2), 7500);
        assert_eq!(run_minimum_cents(3), 10000);
        assert_eq!(run_minimum_cents(0), 0);
    }

    #[test]
    fn test_run_delivery_fee_is_highest_store_fee() {
        assert_eq!(run_delivery_fee_cents([500, 800]), 800);
        assert_eq!(run_delivery_fee_cents([800]), 800);
        assert_eq!(run_delivery_fee_cents([]), 0);
    }

    #[test]
    fn test_order_total() {
        assert_eq!(order_total_cents(2599, 0, 599), 3198);
        assert_eq!(order_total_cents(2599, 260, 599), 2938);
        // discount equal to subtotal leaves just the fee
        assert_eq!(order_total_cents(2599, 2599, 599), 599);
    }

    #[test]
    fn test_run_totals_worked_example() {
        // Two stores: $60 at a 500c-fee store, $40 at an 800c-fee store.
        let estimated = 6000 + 4000;
        let service = service_charge_cents(estimated);
        let delivery = run_delivery_fee_cents([500, 800]);

        assert_eq!(service, 1200);
        assert_eq!(delivery, 800);
        assert_eq!(run_total_cents(estimated, service, delivery, 0, 0), 12000);
    }

    #[test]
    fn test_run_total_with_convenience_fee_and_discount() {
        assert_eq!(run_total_cents(10000, 1200, 800, 200, 1000), 11200);
    }
}
