//! Decimal type utilities for exact balance arithmetic

pub use rust_decimal::Decimal;
pub use rust_decimal_macros::dec;

/// Monetary amount (balances and transaction magnitudes)
pub type Amount = Decimal;
