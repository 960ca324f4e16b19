//! Money helpers using rust_decimal for precision
//!
//! Amounts on a receipt are always shown with two decimals, rounded half-up.

use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places, half-up)
pub const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Maximum allowed unit price (1,000,000.00)
pub const MAX_UNIT_PRICE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Maximum allowed quantity per line
pub const MAX_QUANTITY: u32 = 9999;

/// Maximum transaction amount; `$99999999.99` is the widest value the
/// 12-column totals field holds
pub const MAX_TRANSACTION_AMOUNT: Decimal =
    Decimal::from_parts(1_410_065_407, 2, 0, false, 2); // 9_999_999_999 * 10^-2

/// Round to currency precision (half-up)
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// `quantity * unit_price`
#[inline]
pub fn line_total(quantity: u32, unit_price: Decimal) -> Decimal {
    Decimal::from(quantity) * unit_price
}

/// True when `a` and `b` agree within [`MONEY_TOLERANCE`] (inclusive) after rounding
#[inline]
pub fn money_eq(a: Decimal, b: Decimal) -> bool {
    (round_money(a) - round_money(b)).abs() <= MONEY_TOLERANCE
}
