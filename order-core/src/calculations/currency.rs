use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::common::{group_digits, round_whole};

/// How digits are grouped when an amount is displayed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigitGrouping {
    /// `12,34,567` (en-IN).
    #[default]
    Indian,
    /// `1,234,567`.
    Thousands,
}

/// Display rules for whole-unit monetary amounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub grouping: DigitGrouping,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            symbol: "₹".to_string(),
            grouping: DigitGrouping::Indian,
        }
    }
}

impl CurrencyFormat {
    /// Formats `value` with zero fractional digits and digit grouping.
    pub fn amount(
        &self,
        value: Decimal,
    ) -> String {
        let whole = round_whole(value);
        let digits = whole.abs().trunc().to_string();
        let grouped = group_digits(&digits, self.grouping);
        if whole < Decimal::ZERO {
            format!("-{grouped}")
        } else {
            grouped
        }
    }

    /// Like [`CurrencyFormat::amount`] with the currency symbol prepended.
    pub fn money(
        &self,
        value: Decimal,
    ) -> String {
        format!("{}{}", self.symbol, self.amount(value))
    }
}
