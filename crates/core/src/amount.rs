//! Bounds of stored quantities and money.
//!
//! Every amount column is `NUMERIC(19, 4)`: at most 15 integer digits and 4
//! fractional digits. Values are checked against that range before they reach
//! arithmetic or storage, so the database never rounds or rejects them.

use rust_decimal::{Decimal, RoundingStrategy};

/// Fractional digits kept in storage.
pub const AMOUNT_SCALE: u32 = 4;

/// Exclusive upper bound on the magnitude of a stored amount, `10^15`.
#[must_use]
pub fn amount_limit() -> Decimal {
    Decimal::new(1_000_000_000_000_000, 0)
}

/// Whether `value` is stored exactly, without rounding or overflow.
#[must_use]
pub fn fits_storage(value: Decimal) -> bool {
    value.abs() < amount_limit() && value.normalize().scale() <= AMOUNT_SCALE
}

/// Rounds a derived amount to storage precision, halves away from zero.
#[must_use]
pub fn round_to_storage(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Product of two stored values, rounded to storage precision.
///
/// Returns `None` when the product overflows or does not fit storage.
#[must_use]
pub fn checked_product(a: Decimal, b: Decimal) -> Option<Decimal> {
    a.checked_mul(b)
        .map(round_to_storage)
        .filter(|product| product.abs() < amount_limit())
}

/// Sum of two stored values, `None` when it leaves the storage range.
#[must_use]
pub fn checked_sum(a: Decimal, b: Decimal) -> Option<Decimal> {
    a.checked_add(b).filter(|sum| sum.abs() < amount_limit())
}
