//! Stock arithmetic.

use rust_decimal::Decimal;

use crate::amount::checked_sum;

/// Applies a signed quantity change to stock on hand, flooring the result at zero.
///
/// Purchases pass a positive delta, sales a negative one; reversing a transaction
/// passes the negated delta. Returns `None` when the new stock would not fit
/// the stored range.
#[must_use]
pub fn apply_stock_delta(quantity: Decimal, delta: Decimal) -> Option<Decimal> {
    checked_sum(quantity, delta).map(|stock| stock.max(Decimal::ZERO))
}
