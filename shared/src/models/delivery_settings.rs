//! Delivery Settings Model

use serde::{Deserialize, Serialize};

/// Fixed row id for the settings singleton
pub const DELIVERY_SETTINGS_ID: i64 = 1;

/// Delivery settings entity (singleton row)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DeliverySettings {
    pub id: i64,
    /// Express (ASAP) delivery fee in cents
    pub express_fee_cents: i64,
    /// Scheduled time-slot delivery fee in cents
    pub scheduled_fee_cents: i64,
    /// Late (after-hours) delivery fee in cents
    pub late_fee_cents: i64,
    /// Flat handling fee added to every grocery run, in cents
    pub convenience_fee_cents: i64,
    /// IANA zone name, e.g. "Australia/Adelaide"; validated on write
    pub timezone: String,
    pub estimated_delivery_minutes: i32,
    pub updated_at: i64,
}

/// Update delivery settings payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DeliverySettingsUpdate {
    pub express_fee_cents: Option<i64>,
    pub scheduled_fee_cents: Option<i64>,
    pub late_fee_cents: Option<i64>,
    pub convenience_fee_cents: Option<i64>,
    pub timezone: Option<String>,
    pub estimated_delivery_minutes: Option<i32>,
}
