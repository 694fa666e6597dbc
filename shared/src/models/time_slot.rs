//! Time Slot Model
//!
//! Bookable delivery/pickup windows. Dates are zone-local `YYYY-MM-DD`
//! strings; wall-clock times are `HH:MM`. String comparison on dates is
//! valid because the format is zero-padded and zone-consistent.

use serde::{Deserialize, Serialize};

/// Slot kind: delivery windows or pickup windows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum SlotType {
    Delivery,
    Pickup,
}

impl SlotType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Delivery => "delivery",
            Self::Pickup => "pickup",
        }
    }
}

impl std::fmt::Display for SlotType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Time slot entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TimeSlot {
    pub id: i64,
    /// Calendar date in the configured zone, `YYYY-MM-DD`
    pub slot_date: String,
    /// Local wall-clock `HH:MM`
    pub start_time: String,
    /// Local wall-clock `HH:MM`, strictly after start_time
    pub end_time: String,
    pub slot_type: SlotType,
    pub max_orders: i32,
    pub current_orders: i32,
    pub is_active: bool,
    pub created_at: i64,
}

impl TimeSlot {
    /// Whether this slot can still accept a booking today or later.
    ///
    /// `today` is the current date in the configured zone, `YYYY-MM-DD`.
    pub fn is_open(&self, today: &str) -> bool {
        self.is_active && self.current_orders < self.max_orders && self.slot_date.as_str() >= today
    }
}

/// Create a single time slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlotCreate {
    pub slot_date: String,
    pub start_time: String,
    pub end_time: String,
    pub slot_type: SlotType,
    pub max_orders: i32,
}

/// Bulk-create one slot per date with a shared time range/type/capacity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlotBulkCreate {
    pub dates: Vec<String>,
    pub start_time: String,
    pub end_time: String,
    pub slot_type: SlotType,
    pub max_orders: i32,
}

/// Update time slot payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlotUpdate {
    pub slot_date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub max_orders: Option<i32>,
    pub is_active: Option<bool>,
}

/// One failed date from a bulk creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkCreateFailure {
    pub date: String,
    pub reason: String,
}

/// Bulk creation outcome: prior dates stay committed when a later one fails
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkCreateResult {
    pub created: Vec<TimeSlot>,
    pub failed: Vec<BulkCreateFailure>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(date: &str, current: i32, max: i32, active: bool) -> TimeSlot {
        TimeSlot {
            id: 1,
            slot_date: date.to_string(),
            start_time: "09:00".to_string(),
            end_time: "11:00".to_string(),
            slot_type: SlotType::Delivery,
            max_orders: max,
            current_orders: current,
            is_active: active,
            created_at: 0,
        }
    }

    #[test]
    fn test_open_slot() {
        let s = slot("2025-06-02", 3, 10, true);
        assert!(s.is_open("2025-06-01"));
        assert!(s.is_open("2025-06-02"));
    }

    #[test]
    fn test_full_slot_never_open() {
        // Capacity wins even when the slot is active
        let s = slot("2025-06-02", 10, 10, true);
        assert!(!s.is_open("2025-06-01"));

        let s = slot("2025-06-02", 10, 10, false);
        assert!(!s.is_open("2025-06-01"));
    }

    #[test]
    fn test_inactive_slot_not_open() {
        let s = slot("2025-06-02", 0, 10, false);
        assert!(!s.is_open("2025-06-01"));
    }

    #[test]
    fn test_past_date_not_open() {
        let s = slot("2025-06-02", 0, 10, true);
        assert!(!s.is_open("2025-06-03"));
    }

    #[test]
    fn test_slot_type_as_str() {
        assert_eq!(SlotType::Delivery.as_str(), "delivery");
        assert_eq!(SlotType::Pickup.as_str(), "pickup");
    }

    #[test]
    fn test_slot_type_serde() {
        assert_eq!(
            serde_json::to_string(&SlotType::Delivery).unwrap(),
            "\"delivery\""
        );
        let t: SlotType = serde_json::from_str("\"pickup\"").unwrap();
        assert_eq!(t, SlotType::Pickup);
    }
}
