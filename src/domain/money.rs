use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::Error;

/// Monetary values carry exactly two fractional digits.
pub const BALANCE_SCALE: u32 = 2;

/// Parse a textual amount into a positive decimal rounded to two
/// fractional digits.
///
/// Extra fractional digits are rounded half away from zero rather than
/// rejected, so `"10.155"` normalizes to `10.16`. Only plain base-10
/// decimals are accepted; anything else is an [`Error::InvalidAmount`],
/// and values of zero or below are [`Error::AmountMustBePositive`].
pub fn normalize_amount(raw: &str) -> Result<Decimal, Error> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(Error::InvalidAmount);
    }

    let value = Decimal::from_str(raw).map_err(|_| Error::InvalidAmount)?;
    if value <= Decimal::ZERO {
        return Err(Error::AmountMustBePositive);
    }

    Ok(value.round_dp_with_strategy(BALANCE_SCALE, RoundingStrategy::MidpointAwayFromZero))
}

/// Render a balance with exactly two fractional digits, e.g. `0.00`.
pub fn format_balance(balance: Decimal) -> String {
    let mut rounded =
        balance.round_dp_with_strategy(BALANCE_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(BALANCE_SCALE);
    rounded.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(normalize_amount("10.155").unwrap(), dec("10.16"));
        assert_eq!(normalize_amount("10.154").unwrap(), dec("10.15"));
        assert_eq!(normalize_amount("0.005").unwrap(), dec("0.01"));
    }

    #[test]
    fn keeps_amounts_already_at_two_digits() {
        assert_eq!(normalize_amount("50.00").unwrap(), dec("50.00"));
        assert_eq!(normalize_amount("7").unwrap(), dec("7"));
        assert_eq!(normalize_amount(" 12.5 ").unwrap(), dec("12.5"));
    }

    #[test]
    fn rejects_empty_and_malformed_amounts() {
        assert_eq!(normalize_amount(""), Err(Error::InvalidAmount));
        assert_eq!(normalize_amount("   "), Err(Error::InvalidAmount));
        assert_eq!(normalize_amount("ten"), Err(Error::InvalidAmount));
        assert_eq!(normalize_amount("10.0.0"), Err(Error::InvalidAmount));
        assert_eq!(normalize_amount("1e3"), Err(Error::InvalidAmount));
    }

    #[test]
    fn rejects_non_positive_amounts() {
        assert_eq!(normalize_amount("0"), Err(Error::AmountMustBePositive));
        assert_eq!(normalize_amount("0.00"), Err(Error::AmountMustBePositive));
        assert_eq!(normalize_amount("-3.50"), Err(Error::AmountMustBePositive));
    }

    #[test]
    fn formats_balances_with_two_digits() {
        assert_eq!(format_balance(Decimal::ZERO), "0.00");
        assert_eq!(format_balance(dec("30")), "30.00");
        assert_eq!(format_balance(dec("12.5")), "12.50");
    }
}
