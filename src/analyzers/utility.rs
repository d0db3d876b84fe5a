use chrono::NaiveDate;

/// Rounds to two decimal places, halves away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Formats a calendar date as `Jan-07`.
pub fn month_day(date: NaiveDate) -> String {
    date.format("%b-%d").to_string()
}
