//! Per-field coercion rules.
//!
//! Every parser takes the raw cell (absent when the column or cell does not
//! exist) and returns `None` for anything it cannot read. None of them fail.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use crate::config::CategoryConfig;
use crate::models::PellEligibility;

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%m-%d-%Y"];

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

/// Parses a calendar date, discarding any time of day.
///
/// # Examples
///
/// ```
/// use enrollment_analytics::ingest::fields::parse_date;
/// use chrono::NaiveDate;
///
/// assert_eq!(parse_date(Some("6/1/2020")), NaiveDate::from_ymd_opt(2020, 6, 1));
/// assert_eq!(parse_date(Some("2020-06-01 14:30:00")), NaiveDate::from_ymd_opt(2020, 6, 1));
/// assert_eq!(parse_date(Some("not a date")), None);
/// assert_eq!(parse_date(None), None);
/// ```
pub fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    let text = non_blank(raw)?;

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// Parses a finite decimal number. No range checks are applied.
pub fn parse_number(raw: Option<&str>) -> Option<f64> {
    non_blank(raw)?
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Parses an academic year. Integral decimals such as `2020.0` are accepted.
pub fn parse_year(raw: Option<&str>) -> Option<i32> {
    let value = parse_number(raw)?;
    if value.fract() != 0.0 || value < f64::from(i32::MIN) || value > f64::from(i32::MAX) {
        return None;
    }
    Some(value as i32)
}

/// Parses a monetary amount as an exact decimal.
pub fn parse_decimal(raw: Option<&str>) -> Option<Decimal> {
    let text = non_blank(raw)?;
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Trims a text field; blank becomes missing. Case and inner spacing are kept.
pub fn clean_text(raw: Option<&str>) -> Option<String> {
    non_blank(raw).map(str::to_string)
}

/// Reads a value that the source already stores as a boolean.
///
/// Only recognized boolean spellings map to a value. Anything else is
/// missing, not false.
pub fn parse_flag(raw: Option<&str>) -> Option<bool> {
    let text = non_blank(raw)?.to_ascii_lowercase();
    match text.as_str() {
        "true" | "t" | "1" | "1.0" | "y" | "yes" => Some(true),
        "false" | "f" | "0" | "0.0" | "n" | "no" => Some(false),
        _ => None,
    }
}

/// Retention indicator: true only when the trimmed cell is exactly `1`.
///
/// # Examples
///
/// ```
/// use enrollment_analytics::ingest::fields::retention_flag;
///
/// assert!(retention_flag(Some(" 1 ")));
/// assert!(!retention_flag(Some("1.0")));
/// assert!(!retention_flag(Some("yes")));
/// assert!(!retention_flag(None));
/// ```
pub fn retention_flag(raw: Option<&str>) -> bool {
    raw.is_some_and(|text| text.trim() == "1")
}

/// Maps a raw Pell code through the configured code lists.
pub fn parse_pell(raw: Option<&str>, categories: &CategoryConfig) -> PellEligibility {
    match non_blank(raw) {
        Some(code) if categories.pell_eligible_codes.iter().any(|c| c == code) => {
            PellEligibility::Eligible
        }
        Some(code) if categories.pell_ineligible_codes.iter().any(|c| c == code) => {
            PellEligibility::NotEligible
        }
        _ => PellEligibility::Unknown,
    }
}
