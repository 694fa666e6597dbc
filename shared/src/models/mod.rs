//! Data models
//!
//! Shared between store-server and frontend (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).
//! All money fields are `i64` cents.

pub mod bill;
pub mod category;
pub mod delivery_settings;
pub mod order;
pub mod order_message;
pub mod pickup_order;
pub mod product;
pub mod promo_code;
pub mod store;
pub mod sync;
pub mod time_slot;
pub mod user;

// Re-exports
pub use bill::*;
pub use category::*;
pub use delivery_settings::*;
pub use order::*;
pub use order_message::*;
pub use pickup_order::*;
pub use product::*;
pub use promo_code::*;
pub use store::*;
pub use sync::*;
pub use time_slot::*;
pub use user::*;
