//! Order Bill Model
//!
//! Itemized receipts attached to an order after shopping, optionally with
//! a photographed receipt image.

use serde::{Deserialize, Serialize};

use super::OrderKind;

/// One line on a bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillItem {
    pub name: String,
    /// Unit price in cents
    pub price_cents: i64,
    pub quantity: i64,
}

/// Bill attached to an order
///
/// Items are stored as a JSON column; the repository layer fills `items`
/// after the row read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderBill {
    pub id: i64,
    pub order_kind: OrderKind,
    pub order_id: i64,
    #[cfg_attr(feature = "db", sqlx(skip))]
    pub items: Vec<BillItem>,
    pub total_cents: i64,
    /// Uploaded receipt photo
    pub image_url: Option<String>,
    pub created_at: i64,
}

/// New bill payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderBillCreate {
    pub items: Vec<BillItem>,
    pub total_cents: i64,
    pub image_url: Option<String>,
}
