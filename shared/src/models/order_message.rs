//! Order Message Model
//!
//! Conversation thread attached to an order (delivery or grocery run).

use serde::{Deserialize, Serialize};

/// Which order table a message or bill belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum OrderKind {
    Delivery,
    Pickup,
}

impl OrderKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Delivery => "delivery",
            Self::Pickup => "pickup",
        }
    }
}

impl std::fmt::Display for OrderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum MessageSender {
    Admin,
    Customer,
}

impl MessageSender {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Customer => "customer",
        }
    }
}

impl std::fmt::Display for MessageSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message in an order's thread
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderMessage {
    pub id: i64,
    pub order_kind: OrderKind,
    pub order_id: i64,
    pub sender: MessageSender,
    pub message: String,
    pub created_at: i64,
}

/// New message payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderMessageCreate {
    pub sender: MessageSender,
    pub message: String,
}
