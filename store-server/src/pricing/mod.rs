//! Checkout Pricing Module
//!
//! Fee selection and total assembly for delivery orders and grocery runs.
//! All amounts are `i64` cents end to end; `Decimal` is used inside
//! percentage math so rounding stays exact.

mod calculator;
mod money;

pub use calculator::*;
pub use money::*;
