//! Order Model
//!
//! Delivery checkout orders. Status enums are matched exhaustively;
//! terminal states accept no further transitions.

use serde::{Deserialize, Serialize};

/// Delivery choice for a checkout order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum DeliveryType {
    /// Same-day / ASAP, flat express fee
    Express,
    /// Booked into a future delivery slot
    Scheduled,
    /// After-hours window, flat late fee
    Late,
}

impl DeliveryType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Express => "express",
            Self::Scheduled => "scheduled",
            Self::Late => "late",
        }
    }
}

impl std::fmt::Display for DeliveryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery order lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum OrderStatus {
    Pending,
    Processing,
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::OutForDelivery => "out_for_delivery",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Terminal states accept no further transitions
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Position in the fulfilment pipeline, for forward-only checks
    const fn stage(&self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Processing => 1,
            Self::OutForDelivery => 2,
            Self::Delivered => 3,
            Self::Cancelled => 4,
        }
    }

    /// Whether an admin may move the order from `self` to `next`.
    ///
    /// Forward moves (skipping stages is allowed) and cancellation from
    /// any non-terminal state; never out of a terminal state.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        if self.is_terminal() || *self == next {
            return false;
        }
        match next {
            OrderStatus::Cancelled => true,
            _ => next.stage() > self.stage(),
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment lifecycle, driven by the external gateway's confirmations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum PaymentStatus {
    Pending,
    Paid,
    Confirmed,
    Cancelled,
}

impl PaymentStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }

    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Cancelled)
    }

    /// pending -> paid -> confirmed, cancellable until confirmed
    pub fn can_transition_to(&self, next: PaymentStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Paid)
                | (Self::Pending, Self::Cancelled)
                | (Self::Paid, Self::Confirmed)
                | (Self::Paid, Self::Cancelled)
        )
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub delivery_address: String,
    pub delivery_type: DeliveryType,
    /// Booked slot, present only for scheduled delivery
    pub time_slot_id: Option<i64>,
    pub notes: Option<String>,
    /// Item subtotal in cents
    pub subtotal_cents: i64,
    pub delivery_fee_cents: i64,
    pub discount_cents: i64,
    /// Snapshot of the applied promo code, if any
    pub promo_code: Option<String>,
    pub total_cents: i64,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    /// External gateway confirmation reference
    pub payment_ref: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Order line item (name and price snapshotted at checkout)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub name: String,
    /// Unit price in cents
    pub price_cents: i64,
    pub quantity: i64,
}

/// Cart line submitted at checkout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemInput {
    /// When set, the server snapshots the catalog price and name instead
    pub product_id: Option<i64>,
    #[serde(default)]
    pub name: String,
    /// Unit price in cents (ignored when product_id resolves)
    #[serde(default)]
    pub price_cents: i64,
    pub quantity: i64,
}

/// Checkout submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub delivery_address: String,
    pub delivery_type: DeliveryType,
    pub time_slot_id: Option<i64>,
    pub notes: Option<String>,
    pub items: Vec<OrderItemInput>,
    pub promo_code: Option<String>,
}

/// Admin status change
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}

/// Payment state change, from the gateway callback or the back office
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentUpdate {
    pub payment_status: PaymentStatus,
    pub payment_ref: Option<String>,
}

/// Full order view for the back office and order-tracking page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub messages: Vec<super::OrderMessage>,
    pub bills: Vec<super::OrderBill>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_forward_transitions() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Processing));
        assert!(OrderStatus::Processing.can_transition_to(OrderStatus::OutForDelivery));
        assert!(OrderStatus::OutForDelivery.can_transition_to(OrderStatus::Delivered));
        // Skipping stages is allowed
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Delivered));
    }

    #[test]
    fn test_order_status_no_backward_transitions() {
        assert!(!OrderStatus::Processing.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::OutForDelivery.can_transition_to(OrderStatus::Processing));
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::OutForDelivery));
    }

    #[test]
    fn test_order_status_cancel_from_any_active_state() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::Processing.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::OutForDelivery.can_transition_to(OrderStatus::Cancelled));
    }

    #[test]
    fn test_order_status_terminal_states_frozen() {
        for next in [
            OrderStatus::Pending,
            OrderStatus::Processing,
            OrderStatus::OutForDelivery,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert!(!OrderStatus::Delivered.can_transition_to(next));
            assert!(!OrderStatus::Cancelled.can_transition_to(next));
        }
    }

    #[test]
    fn test_order_status_self_transition_rejected() {
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::Processing.can_transition_to(OrderStatus::Processing));
    }

    #[test]
    fn test_payment_status_transitions() {
        assert!(PaymentStatus::Pending.can_transition_to(PaymentStatus::Paid));
        assert!(PaymentStatus::Paid.can_transition_to(PaymentStatus::Confirmed));
        assert!(PaymentStatus::Pending.can_transition_to(PaymentStatus::Cancelled));
        assert!(PaymentStatus::Paid.can_transition_to(PaymentStatus::Cancelled));

        // No skipping straight to confirmed, no reopening
        assert!(!PaymentStatus::Pending.can_transition_to(PaymentStatus::Confirmed));
        assert!(!PaymentStatus::Confirmed.can_transition_to(PaymentStatus::Cancelled));
        assert!(!PaymentStatus::Cancelled.can_transition_to(PaymentStatus::Pending));
    }

    #[test]
    fn test_status_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::OutForDelivery).unwrap(),
            "\"out_for_delivery\""
        );
        let s: OrderStatus = serde_json::from_str("\"delivered\"").unwrap();
        assert_eq!(s, OrderStatus::Delivered);

        assert_eq!(
            serde_json::to_string(&DeliveryType::Express).unwrap(),
            "\"express\""
        );
    }
}
