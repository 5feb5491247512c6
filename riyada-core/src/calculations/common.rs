//! Shared arithmetic for the course calculators.
//!
//! Every calculator works in [`Decimal`] and applies rates through
//! [`percent_of`], so the tables agree with each other to the cent.
//!
//! The calculators use plain decimal arithmetic. Callers that accept
//! free-form input check it with [`within_range`] first: any mix of values
//! inside `±MAX_AMOUNT` keeps every table total far below the largest
//! representable [`Decimal`].

use rust_decimal::Decimal;

/// Largest magnitude accepted for a worksheet amount or rate: one trillion.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// Whether `value` lies within `±MAX_AMOUNT`.
pub fn within_range(value: Decimal) -> bool {
    value.abs() <= MAX_AMOUNT
}

/// Applies a percentage rate expressed in whole percent (`20` means 20%).
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use riyada_core::calculations::common::percent_of;
///
/// assert_eq!(percent_of(dec!(27500), dec!(10)), dec!(2750));
/// assert_eq!(percent_of(dec!(2000), dec!(20)), dec!(400));
/// ```
pub fn percent_of(
    value: Decimal,
    rate: Decimal,
) -> Decimal {
    value * rate / Decimal::ONE_HUNDRED
}

/// Tax owed on a profit figure: nothing on a loss or break-even result.
pub fn tax_on_profit(
    net_profit: Decimal,
    rate: Decimal,
) -> Decimal {
    if net_profit > Decimal::ZERO {
        percent_of(net_profit, rate)
    } else {
        Decimal::ZERO
    }
}

/// Sums a sequence of decimal values.
pub fn sum<I>(values: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    values.into_iter().fold(Decimal::ZERO, |acc, v| acc + v)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // percent_of / tax_on_profit tests
    // =========================================================================

    #[test]
    fn percent_of_applies_whole_percent_rate() {
        assert_eq!(percent_of(dec!(12500), dec!(20)), dec!(2500));
    }

    #[test]
    fn percent_of_zero_rate_is_zero() {
        assert_eq!(percent_of(dec!(12500), dec!(0)), dec!(0));
    }

    #[test]
    fn tax_on_profit_taxes_positive_profit() {
        assert_eq!(tax_on_profit(dec!(2000), dec!(20)), dec!(400));
    }

    #[test]
    fn tax_on_profit_is_zero_on_loss() {
        assert_eq!(tax_on_profit(dec!(-500), dec!(20)), Decimal::ZERO);
    }

    #[test]
    fn tax_on_profit_is_zero_at_break_even() {
        assert_eq!(tax_on_profit(Decimal::ZERO, dec!(20)), Decimal::ZERO);
    }

    // =========================================================================
    // range tests
    // =========================================================================

    #[test]
    fn max_amount_is_one_trillion() {
        assert_eq!(MAX_AMOUNT, dec!(1000000000000));
    }

    #[test]
    fn within_range_is_inclusive_on_both_sides() {
        assert!(within_range(MAX_AMOUNT));
        assert!(within_range(-MAX_AMOUNT));
        assert!(within_range(dec!(0.000001)));
        assert!(!within_range(MAX_AMOUNT + dec!(0.01)));
        assert!(!within_range(Decimal::MIN));
    }

    #[test]
    fn percent_of_extremes_stays_representable() {
        assert_eq!(
            percent_of(MAX_AMOUNT, MAX_AMOUNT),
            dec!(10000000000000000000000)
        );
    }

    // =========================================================================
    // sum tests
    // =========================================================================

    #[test]
    fn sum_of_empty_is_zero() {
        assert_eq!(sum(Vec::<Decimal>::new()), Decimal::ZERO);
    }

    #[test]
    fn sum_adds_all_values() {
        assert_eq!(sum([dec!(1.5), dec!(2.5), dec!(-1)]), dec!(3));
    }
}
