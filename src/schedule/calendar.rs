//! Calendar helpers shared by occurrence stepping and window clipping.
//!
//! Month and year shifts clamp the day to the length of the target month, so
//! an anchor on the 31st lands on the last day of shorter months. Helpers
//! return `None` only when the result leaves chrono's representable range.

use chrono::{Datelike, Duration, NaiveDate};

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let first_next = if month == 12 {
        year
            .checked_add(1)
            .and_then(|next| NaiveDate::from_ymd_opt(next, 1, 1))
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    match first_next {
        Some(first_next) => (first_next - Duration::days(1)).day(),
        None => 31,
    }
}

pub fn shift_month(date: NaiveDate, months: i64) -> Option<NaiveDate> {
    let index = month_index(date).checked_add(months)?;
    let year = i32::try_from(index.div_euclid(12)).ok()?;
    let month = (index.rem_euclid(12) + 1) as u32;
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
}

pub fn shift_year(date: NaiveDate, years: i64) -> Option<NaiveDate> {
    let year = i32::try_from(i64::from(date.year()).checked_add(years)?).ok()?;
    let day = date.day().min(days_in_month(year, date.month()));
    NaiveDate::from_ymd_opt(year, date.month(), day)
}

/// Months since year 0, used for month-granularity comparisons.
pub fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

pub fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    month_index(a) == month_index(b)
}

pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn month_end(date: NaiveDate) -> NaiveDate {
    let last = days_in_month(date.year(), date.month());
    date.with_day(last).unwrap_or(date)
}

pub fn year_start(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date)
}

pub fn year_end(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 12, 31).unwrap_or(date)
}

/// Number of days covered by `[start, end]`, counting both endpoints.
/// An inverted interval covers zero days.
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> i64 {
    if start > end {
        0
    } else {
        (end - start).num_days() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(2025, 12), 31);
        assert_eq!(days_in_month(2025, 4), 30);
    }

    #[test]
    fn shift_month_clamps_to_month_end() {
        assert_eq!(shift_month(date(2025, 1, 31), 1), Some(date(2025, 2, 28)));
        assert_eq!(shift_month(date(2024, 1, 31), 1), Some(date(2024, 2, 29)));
        assert_eq!(shift_month(date(2025, 1, 31), 2), Some(date(2025, 3, 31)));
        assert_eq!(shift_month(date(2025, 11, 15), 3), Some(date(2026, 2, 15)));
        assert_eq!(shift_month(date(2025, 1, 15), -1), Some(date(2024, 12, 15)));
    }

    #[test]
    fn shift_year_moves_leap_day_to_feb_28() {
        assert_eq!(shift_year(date(2024, 2, 29), 1), Some(date(2025, 2, 28)));
        assert_eq!(shift_year(date(2024, 2, 29), 4), Some(date(2028, 2, 29)));
    }

    #[test]
    fn shifts_out_of_range_return_none() {
        assert_eq!(shift_year(date(2025, 1, 1), i64::MAX / 2), None);
        assert_eq!(shift_month(date(2025, 1, 1), i64::MAX / 24), None);
    }

    #[test]
    fn inclusive_days_counts_both_endpoints() {
        assert_eq!(inclusive_days(date(2025, 3, 1), date(2025, 3, 1)), 1);
        assert_eq!(inclusive_days(date(2025, 3, 1), date(2025, 3, 31)), 31);
        assert_eq!(inclusive_days(date(2025, 3, 2), date(2025, 3, 1)), 0);
    }

    #[test]
    fn month_and_year_bounds() {
        let d = date(2024, 2, 10);
        assert_eq!(month_start(d), date(2024, 2, 1));
        assert_eq!(month_end(d), date(2024, 2, 29));
        assert_eq!(year_start(d), date(2024, 1, 1));
        assert_eq!(year_end(d), date(2024, 12, 31));
        assert!(same_month(d, date(2024, 2, 29)));
        assert!(!same_month(d, date(2025, 2, 10)));
    }
}
