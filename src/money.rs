//! Currency amounts are stored as integer minor units (cents) and exposed as decimals.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{AppError, AppResult};

const SCALE: u32 = 2;

pub fn from_minor_units(cents: i64) -> Decimal {
    Decimal::new(cents, SCALE)
}

/// Converts a non-negative amount to cents, rounding half away from zero.
pub fn to_minor_units(amount: Decimal) -> AppResult<i64> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(AppError::BadRequest("Price must not be negative".into()));
    }
    let rounded = amount.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|cents| cents.to_i64())
        .ok_or_else(|| AppError::BadRequest("Price is out of range".into()))
}

/// `quantity * unit_price`, failing on overflow instead of wrapping.
pub fn line_total(quantity: i32, unit_price: i64) -> AppResult<i64> {
    unit_price
        .checked_mul(i64::from(quantity))
        .ok_or_else(|| AppError::BadRequest("Order total is out of range".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn converts_between_decimal_and_cents() {
        assert_eq!(to_minor_units(Decimal::from_str("9.50").unwrap()).unwrap(), 950);
        assert_eq!(from_minor_units(1900), Decimal::from_str("19.00").unwrap());
        assert_eq!(to_minor_units(Decimal::ZERO).unwrap(), 0);
    }

    #[test]
    fn rounds_to_whole_cents() {
        assert_eq!(to_minor_units(Decimal::from_str("1.005").unwrap()).unwrap(), 101);
        assert_eq!(to_minor_units(Decimal::from_str("2.994").unwrap()).unwrap(), 299);
    }

    #[test]
    fn rejects_negative_amounts() {
        let err = to_minor_units(Decimal::from_str("-0.01").unwrap()).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(err.to_string(), "Price must not be negative");
    }

    #[test]
    fn line_total_detects_overflow() {
        assert_eq!(line_total(2, 950).unwrap(), 1900);
        let err = line_total(i32::MAX, i64::MAX / 2).unwrap_err();
        assert_eq!(err.to_string(), "Order total is out of range");
    }
}
