//! Money arithmetic using rust_decimal for precision

use rust_decimal::prelude::*;

/// Percent-like values are scaled by 100: 1200 = 12.00%
const PERCENT_SCALE: i64 = 10_000;

/// Apply a scaled percentage to an amount in cents, rounded half away
/// from zero. `percentage_of(2599, 1000)` is 10% of $25.99 = 260 cents.
#[inline]
pub fn percentage_of(amount_cents: i64, percent_scaled: i64) -> i64 {
    let exact =
        Decimal::from(amount_cents) * Decimal::from(percent_scaled) / Decimal::from(PERCENT_SCALE);
    exact
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        // SAFETY: product of two i64 fits in Decimal's 96-bit mantissa and the
        // quotient is no larger than the inputs
        .expect("cent amount rounded to integer is always representable as i64")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_of_rounds_half_away_from_zero() {
        // 10% of $25.99 = $2.599 -> 260 cents
        assert_eq!(percentage_of(2599, 1000), 260);
        // 12% of $100.00
        assert_eq!(percentage_of(10000, 1200), 1200);
        // 10.5 cents rounds up
        assert_eq!(percentage_of(105, 1000), 11);
        // exact values stay exact
        assert_eq!(percentage_of(5000, 2000), 1000);
        assert_eq!(percentage_of(0, 1200), 0);
    }

    #[test]
    fn test_percentage_of_full_amount() {
        assert_eq!(percentage_of(4299, 10000), 4299);
    }
}
