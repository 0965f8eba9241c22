use chrono::{Datelike, Local, NaiveDate};

/// Whole years between `date_of_birth` and `today`.
///
/// One less than the year difference when today's month/day falls before the
/// birthday. Callers must pass the current date at call time.
pub fn compute_age(date_of_birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    age
}

/// Today's date in the server's local timezone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Splits comma-separated input and trims each piece.
///
/// Empty pieces are kept, so `""` yields `[""]` and `"a,,b"` yields
/// `["a", "", "b"]`. Nothing is deduplicated.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',').map(|piece| piece.trim().to_string()).collect()
}
