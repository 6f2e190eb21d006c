use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::services::clock::parse_date;

/// Weekdays in the half-open interval `(start, end]`.
///
/// Returns 0 when either date fails to parse or `start >= end`. No holiday
/// calendar is applied.
pub fn business_days(start: &str, end: &str) -> i64 {
    match (parse_date(start), parse_date(end)) {
        (Some(start), Some(end)) => business_days_between(start, end),
        _ => 0,
    }
}

pub fn business_days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    if start >= end {
        return 0;
    }

    let days = (end - start).num_days();
    let full_weeks = days / 7;
    let mut count = full_weeks * 5;

    // Walk the remainder that does not fill a whole week
    let mut current = start + Duration::days(full_weeks * 7);
    for _ in 0..days % 7 {
        current += Duration::days(1);
        if !is_weekend(current) {
            count += 1;
        }
    }

    count
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}
