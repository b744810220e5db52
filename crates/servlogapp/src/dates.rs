//! ISO calendar-date helpers.
//!
//! Dates travel through servlog as fixed-width `YYYY-MM-DD` strings. Because the
//! format is zero-padded, plain string comparison orders them chronologically,
//! which is what the range filters and the minimum-date check rely on.

use chrono::{Local, NaiveDate};

/// Minimum allowed ISO date (inclusive).
pub const MIN_ISO_DATE: &str = "1970-01-01";

const ISO_FORMAT: &str = "%Y-%m-%d";

/// Today's date in local time.
pub fn today_iso() -> String {
    Local::now().date_naive().format(ISO_FORMAT).to_string()
}

/// The calendar day after `iso`.
///
/// Returns `None` when `iso` is not shaped like an ISO date or does not name a
/// real calendar day (`2023-02-30`).
pub fn plus_one_day_iso(iso: &str) -> Option<String> {
    let date = parse_iso(iso)?;
    let next = date.succ_opt()?;
    Some(next.format(ISO_FORMAT).to_string())
}

/// Structural `dddd-dd-dd` check. Calendar correctness is not checked.
pub fn is_iso_date(v: &str) -> bool {
    let bytes = v.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

pub fn is_before_min(iso: &str) -> bool {
    is_iso_date(iso) && iso < MIN_ISO_DATE
}

fn parse_iso(iso: &str) -> Option<NaiveDate> {
    if !is_iso_date(iso) {
        return None;
    }
    NaiveDate::parse_from_str(iso, ISO_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plus_one_day_handles_leap_years() {
        assert_eq!(plus_one_day_iso("2024-02-28").as_deref(), Some("2024-02-29"));
        assert_eq!(plus_one_day_iso("2023-02-28").as_deref(), Some("2023-03-01"));
        assert_eq!(plus_one_day_iso("2024-02-29").as_deref(), Some("2024-03-01"));
    }

    #[test]
    fn plus_one_day_crosses_year_boundary() {
        assert_eq!(plus_one_day_iso("2023-12-31").as_deref(), Some("2024-01-01"));
        assert_eq!(plus_one_day_iso("2024-04-30").as_deref(), Some("2024-05-01"));
    }

    #[test]
    fn plus_one_day_rejects_non_dates() {
        assert_eq!(plus_one_day_iso("2023-02-30"), None);
        assert_eq!(plus_one_day_iso("2024-2-5"), None);
        assert_eq!(plus_one_day_iso(""), None);
    }

    #[test]
    fn iso_shape_is_structural_only() {
        assert!(is_iso_date("2023-02-30"));
        assert!(is_iso_date("0000-00-00"));
        assert!(!is_iso_date("2023-2-03"));
        assert!(!is_iso_date("2023/02/03"));
        assert!(!is_iso_date("2023-02-03T00:00"));
        assert!(!is_iso_date(""));
    }

    #[test]
    fn min_bound_is_inclusive() {
        assert!(is_before_min("1969-12-31"));
        assert!(!is_before_min("1970-01-01"));
        assert!(!is_before_min("2024-06-01"));
        // Not a date at all, so not "before" anything.
        assert!(!is_before_min("abc"));
    }

    #[test]
    fn today_is_iso_shaped() {
        let today = today_iso();
        assert!(is_iso_date(&today));
        assert!(plus_one_day_iso(&today).is_some());
    }
}
