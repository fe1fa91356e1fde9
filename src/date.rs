use chrono::{Local, NaiveDate};

/// Title of the default list, e.g. "Friday, October 16".
pub fn day_label(date: NaiveDate) -> String {
    date.format("%A, %B %-d").to_string()
}

pub fn today_label() -> String {
    day_label(Local::now().date_naive())
}
