//! Internal helpers for model validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! parsing, calendar and ratio math so every service applies the same rules.

use chrono::{DateTime, Datelike, Months, TimeZone, Utc};
use uuid::Uuid;

use crate::{Currency, EngineError, ResultEngine};

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::InvalidId(format!("invalid {label} id")))
}

/// Parse a currency code stored in the DB.
pub(crate) fn model_currency(value: &str) -> ResultEngine<Currency> {
    Currency::try_from(value)
}

/// `part / whole * 100`, or 0 when `whole` is 0.
pub(crate) fn percentage(part: i64, whole: i64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 * 100.0 / whole as f64
}

/// Sum of minor amounts, clamped at `i64::MAX` instead of overflowing.
pub(crate) fn saturating_sum(amounts: impl IntoIterator<Item = i64>) -> i64 {
    amounts.into_iter().fold(0, i64::saturating_add)
}

/// Midnight (UTC) of the first day of `at`'s month.
pub(crate) fn start_of_month(at: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(at.year(), at.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(at)
}

/// Midnight (UTC) of January 1st of `at`'s year.
pub(crate) fn start_of_year(at: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(at.year(), 1, 1, 0, 0, 0)
        .single()
        .unwrap_or(at)
}

/// Shift by whole calendar months (negative goes back). Day-of-month is
/// clamped to the target month's length.
pub(crate) fn shift_months(at: DateTime<Utc>, months: i32) -> DateTime<Utc> {
    let shifted = if months >= 0 {
        at.checked_add_months(Months::new(months.unsigned_abs()))
    } else {
        at.checked_sub_months(Months::new(months.unsigned_abs()))
    };
    shifted.unwrap_or(at)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saturating_sum_clamps_instead_of_overflowing() {
        assert_eq!(saturating_sum([1, 2, 3]), 6);
        assert_eq!(saturating_sum([i64::MAX, 1]), i64::MAX);
        assert_eq!(saturating_sum(std::iter::empty()), 0);
    }

    #[test]
    fn percentage_guards_zero_denominator() {
        assert_eq!(percentage(10, 0), 0.0);
        assert_eq!(percentage(25, 100), 25.0);
        assert_eq!(percentage(150, 100), 150.0);
    }

    #[test]
    fn month_boundaries() {
        let at = Utc.with_ymd_and_hms(2026, 3, 31, 17, 45, 0).unwrap();
        assert_eq!(
            start_of_month(at),
            Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            start_of_year(at),
            Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            shift_months(at, -1),
            Utc.with_ymd_and_hms(2026, 2, 28, 17, 45, 0).unwrap()
        );
        assert_eq!(
            shift_months(start_of_month(at), 1),
            Utc.with_ymd_and_hms(2026, 4, 1, 0, 0, 0).unwrap()
        );
    }
}
