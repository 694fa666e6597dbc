//! Store Model
//!
//! Partner stores customers can add to a grocery run.

use serde::{Deserialize, Serialize};

/// Store entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Store {
    pub id: i64,
    pub name: String,
    pub address: String,
    /// Per-store delivery fee in cents; a run charges only the highest
    pub delivery_fee_cents: i64,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create store payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreCreate {
    pub name: String,
    pub address: String,
    /// Delivery fee in cents
    pub delivery_fee_cents: i64,
    pub image_url: Option<String>,
}

/// Update store payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreUpdate {
    pub name: Option<String>,
    pub address: Option<String>,
    pub delivery_fee_cents: Option<i64>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}
