//! Pickup Order Model
//!
//! Multi-store grocery runs. One shopper visits every selected store in a
//! single trip, so the customer pays one consolidated delivery fee plus a
//! service charge on the combined estimate.

use serde::{Deserialize, Serialize};

/// Grocery run lifecycle, shared by the parent order and its store entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum PickupStatus {
    Pending,
    Processing,
    Completed,
    Cancelled,
}

impl PickupStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    const fn stage(&self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Processing => 1,
            Self::Completed => 2,
            Self::Cancelled => 3,
        }
    }

    /// Forward moves and cancellation only; terminal states stay put
    pub fn can_transition_to(&self, next: PickupStatus) -> bool {
        if self.is_terminal() || *self == next {
            return false;
        }
        match next {
            PickupStatus::Cancelled => true,
            _ => next.stage() > self.stage(),
        }
    }
}

impl std::fmt::Display for PickupStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grocery run parent order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PickupOrder {
    pub id: i64,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub delivery_address: String,
    /// Booked pickup-type slot for the run
    pub time_slot_id: Option<i64>,
    pub notes: Option<String>,
    /// Σ of per-store estimates in cents
    pub estimated_total_cents: i64,
    /// 12% of the combined estimate
    pub service_charge_cents: i64,
    /// Highest per-store fee, one consolidated trip
    pub delivery_fee_cents: i64,
    pub convenience_fee_cents: i64,
    pub discount_cents: i64,
    pub promo_code: Option<String>,
    pub total_cents: i64,
    pub status: PickupStatus,
    pub payment_status: super::PaymentStatus,
    pub payment_ref: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Per-store entry of a grocery run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PickupOrderStore {
    pub id: i64,
    pub pickup_order_id: i64,
    pub store_id: i64,
    /// Name snapshot at checkout, survives later store renames
    pub store_name: String,
    pub estimated_total_cents: i64,
    /// Receipt total, null until the shopper has visited the store
    pub actual_total_cents: Option<i64>,
    /// Shopping list / customer instructions for this store
    pub notes: Option<String>,
    pub status: PickupStatus,
}

/// One selected store in a grocery run submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreEntryInput {
    pub store_id: i64,
    pub estimated_total_cents: i64,
    pub notes: Option<String>,
}

/// Grocery run checkout submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupOrderCreate {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub delivery_address: String,
    pub time_slot_id: Option<i64>,
    pub notes: Option<String>,
    pub stores: Vec<StoreEntryInput>,
    pub promo_code: Option<String>,
}

/// Admin status change for the parent run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupStatusUpdate {
    pub status: PickupStatus,
}

/// Shopper update for one store entry after the store visit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreEntryUpdate {
    pub actual_total_cents: Option<i64>,
    pub notes: Option<String>,
    pub status: Option<PickupStatus>,
}

/// Full grocery run view with store entries, thread and bills
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupOrderDetail {
    #[serde(flatten)]
    pub order: PickupOrder,
    pub stores: Vec<PickupOrderStore>,
    pub messages: Vec<super::OrderMessage>,
    pub bills: Vec<super::OrderBill>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pickup_status_transitions() {
        assert!(PickupStatus::Pending.can_transition_to(PickupStatus::Processing));
        assert!(PickupStatus::Processing.can_transition_to(PickupStatus::Completed));
        assert!(PickupStatus::Pending.can_transition_to(PickupStatus::Completed));
        assert!(PickupStatus::Pending.can_transition_to(PickupStatus::Cancelled));
        assert!(PickupStatus::Processing.can_transition_to(PickupStatus::Cancelled));
    }

    #[test]
    fn test_pickup_status_terminal_states_frozen() {
        for next in [
            PickupStatus::Pending,
            PickupStatus::Processing,
            PickupStatus::Completed,
            PickupStatus::Cancelled,
        ] {
            assert!(!PickupStatus::Completed.can_transition_to(next));
            assert!(!PickupStatus::Cancelled.can_transition_to(next));
        }
    }

    #[test]
    fn test_pickup_status_no_backward_transitions() {
        assert!(!PickupStatus::Processing.can_transition_to(PickupStatus::Pending));
    }

    #[test]
    fn test_pickup_status_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&PickupStatus::Processing).unwrap(),
            "\"processing\""
        );
        let s: PickupStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(s, PickupStatus::Completed);
    }
}
