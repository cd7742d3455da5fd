//! Money validation helpers.
//!
//! All monetary values are [`Decimal`] with at most two fractional digits.

use crate::errors::{Error, Result};
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait,
    sea_query::{Expr, Func, SimpleExpr},
};

/// Number of fractional digits a stored amount may carry.
pub const CENT_SCALE: u32 = 2;

/// Rejects negative amounts and amounts with sub-cent precision.
pub fn ensure_non_negative(amount: Decimal) -> Result<()> {
    if amount < Decimal::ZERO {
        return Err(Error::InvalidAmount { amount });
    }
    ensure_cents(amount)
}

/// Rejects amounts that are zero or negative, or have sub-cent precision.
pub fn ensure_positive(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(Error::InvalidAmount { amount });
    }
    ensure_cents(amount)
}

/// Rejects amounts with more than two fractional digits.
pub fn ensure_cents(amount: Decimal) -> Result<()> {
    if amount.round_dp(CENT_SCALE) != amount {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(())
}

/// Rounds an amount to the cent using banker's rounding.
#[must_use]
pub fn to_cents(amount: Decimal) -> Decimal {
    amount.round_dp(CENT_SCALE)
}

/// `ROUND(column + delta, 2)`, for running balances updated in place.
///
/// Decimal columns are REAL in SQLite; stored balances must not carry sub-cent residue.
pub(crate) fn add_in_cents<C: ColumnTrait>(column: C, delta: Decimal) -> SimpleExpr {
    Func::round_with_precision(Expr::col(column).add(delta), CENT_SCALE).into()
}
