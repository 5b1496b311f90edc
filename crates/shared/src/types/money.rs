//! Money helpers over `rust_decimal::Decimal`.
//!
//! CRITICAL: Never use floating-point for money calculations.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places every booked amount carries.
pub const MONEY_SCALE: u32 = 2;

/// Largest amount a `NUMERIC(19,2)` column can hold.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0x89E7_FFFF, 0x8AC7_2304, 0, false, MONEY_SCALE);

/// Rounds an amount to two decimal places, half away from zero.
///
/// Fee percentages are the only source of sub-pesewa amounts.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns true if the amount has no more than two decimal places.
#[must_use]
pub fn has_valid_scale(amount: Decimal) -> bool {
    amount.normalize().scale() <= MONEY_SCALE
}

/// Returns true if the amount fits a booked money column.
#[must_use]
pub fn within_limit(amount: Decimal) -> bool {
    amount.abs() <= MAX_AMOUNT
}
