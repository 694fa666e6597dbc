//! Promo Code Model

use serde::{Deserialize, Serialize};

/// Discount kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum DiscountType {
    /// Percentage of the subtotal
    Percentage,
    /// Fixed amount off
    Fixed,
}

impl DiscountType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Percentage => "percentage",
            Self::Fixed => "fixed",
        }
    }
}

impl std::fmt::Display for DiscountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Promo code entity
///
/// Codes are stored uppercase; lookups normalize the submitted string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PromoCode {
    pub id: i64,
    pub code: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    /// Scaled by 100: 1000 = 10.00% (percentage) or $10.00 (fixed)
    pub discount_value: i64,
    /// Minimum subtotal in cents required to apply this code
    pub minimum_order_cents: i64,
    /// None = unlimited uses
    pub max_uses: Option<i64>,
    /// Incremented only by atomic redemption, never decremented
    pub current_uses: i64,
    /// UTC milliseconds
    pub valid_from: i64,
    /// UTC milliseconds, None = no expiry
    pub valid_until: Option<i64>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create promo code payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromoCodeCreate {
    pub code: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    /// Scaled by 100: 1000 = 10.00% or $10.00
    pub discount_value: i64,
    pub minimum_order_cents: Option<i64>,
    pub max_uses: Option<i64>,
    pub valid_from: i64,
    pub valid_until: Option<i64>,
}

/// Update promo code payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromoCodeUpdate {
    pub description: Option<String>,
    pub discount_type: Option<DiscountType>,
    pub discount_value: Option<i64>,
    pub minimum_order_cents: Option<i64>,
    pub max_uses: Option<i64>,
    pub valid_from: Option<i64>,
    pub valid_until: Option<i64>,
    pub is_active: Option<bool>,
}

/// Validate a code against a subtotal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromoValidateRequest {
    pub code: String,
    pub subtotal_cents: i64,
}

/// Successful validation result returned to the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppliedPromo {
    pub code: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    /// Scaled by 100, as stored
    pub discount_value: i64,
    /// Computed discount in cents, clamped to the subtotal
    pub discount_amount_cents: i64,
}
