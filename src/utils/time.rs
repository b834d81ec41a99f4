use std::time::SystemTime;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Timelike};

pub const MINUTES_PER_HOUR: usize = 60;
pub const MINUTES_PER_DAY: usize = 24 * MINUTES_PER_HOUR;

/// Index of the minute-of-day `moment` falls into, in `0..MINUTES_PER_DAY`.
pub fn minute_slot<Tz: TimeZone>(moment: &DateTime<Tz>) -> usize {
    moment.hour() as usize * MINUTES_PER_HOUR + moment.minute() as usize
}

/// Calendar date of a file system timestamp in local time.
pub fn local_date(time: SystemTime) -> NaiveDate {
    DateTime::<Local>::from(time).date_naive()
}
