use chrono::{Datelike, Days, NaiveDate};

/// The Sunday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_sunday());
    date - Days::new(offset)
}
