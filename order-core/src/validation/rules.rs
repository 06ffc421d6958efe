//! Format rules for individual fields.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::models::ORDER_DATE_FORMAT;

/// Ten digits, the first one of 6, 7, 8 or 9.
static MOBILE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[6-9]\d{9}$").expect("mobile pattern compiles"));

/// Returns `true` for a 10-digit Indian mobile number starting with 6-9.
///
/// The value is checked as entered; surrounding whitespace makes it invalid.
pub fn is_valid_mobile(mobile: &str) -> bool {
    MOBILE_PATTERN.is_match(mobile)
}

/// Parses an order date in `YYYY-MM-DD` form.
pub fn parse_order_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), ORDER_DATE_FORMAT).ok()
}

/// Returns `true` when `value` is a date on or before `today`.
///
/// Comparison is by calendar day. A blank or unparseable date is never
/// valid.
pub fn is_valid_order_date(
    value: &str,
    today: NaiveDate,
) -> bool {
    parse_order_date(value).is_some_and(|date| date <= today)
}
