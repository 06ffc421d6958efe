//! Common helpers shared by the pricing and display code.

use rust_decimal::{Decimal, RoundingStrategy};

use super::currency::DigitGrouping;

/// Rounds a decimal value to a whole number using half-up rounding.
///
/// Values at exactly .5 are rounded away from zero, matching how the
/// summary panel drops fractional digits.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use order_core::calculations::common::round_whole;
///
/// assert_eq!(round_whole(dec!(14520.4)), dec!(14520));
/// assert_eq!(round_whole(dec!(14520.5)), dec!(14521));
/// assert_eq!(round_whole(dec!(-0.5)), dec!(-1));
/// ```
pub fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Inserts group separators into a string of ASCII digits.
///
/// `Indian` keeps the last three digits together and groups the rest in
/// pairs (`12,34,567`); `Thousands` groups everything in threes
/// (`1,234,567`).
pub fn group_digits(
    digits: &str,
    grouping: DigitGrouping,
) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let step = match grouping {
        DigitGrouping::Indian => 2,
        DigitGrouping::Thousands => 3,
    };

    let mut groups = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(step);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    groups.push(tail);
    groups.join(",")
}
