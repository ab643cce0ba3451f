//! Range validation for calendar and offset fields.
//!
//! Each check returns a `Range` error naming the field, its bounds and the
//! offered value.

use core::ops::RangeInclusive;

use crate::{utils, TempoError, TempoResult};

/// The largest offset magnitude in seconds, `15:59:59`.
pub const MAX_OFFSET_SECONDS: i64 = 15 * 3600 + 59 * 60 + 59;

/// Checks that `value` lies within `range`.
#[inline]
pub fn check_range(
    field: &'static str,
    value: i64,
    range: RangeInclusive<i64>,
) -> TempoResult<()> {
    if !range.contains(&value) {
        return Err(TempoError::field(field, *range.start(), *range.end(), value));
    }
    Ok(())
}

/// Checks a year against the representable `i32` range.
pub fn check_year(year: i64) -> TempoResult<()> {
    check_range("year", year, i64::from(i32::MIN)..=i64::from(i32::MAX))
}

/// Checks a month of year.
pub fn check_month(month: i64) -> TempoResult<()> {
    check_range("month", month, 1..=12)
}

/// Checks a day of month, accounting for month length and leap years.
pub fn check_day(year: i32, month: u8, day: i64) -> TempoResult<()> {
    check_month(month.into())?;
    let days_in_month = utils::iso_days_in_month(year, month);
    check_range("day", day, 1..=i64::from(days_in_month))
}

/// Checks an hour of day.
pub fn check_hour(hour: i64) -> TempoResult<()> {
    check_range("hour", hour, 0..=23)
}

/// Checks a minute of hour.
pub fn check_minute(minute: i64) -> TempoResult<()> {
    check_range("minute", minute, 0..=59)
}

/// Checks a second of minute.
pub fn check_second(second: i64) -> TempoResult<()> {
    check_range("second", second, 0..=59)
}

/// Checks a microsecond of second.
pub fn check_microsecond(microsecond: i64) -> TempoResult<()> {
    check_range("microsecond", microsecond, 0..=999_999)
}

/// Checks the unsigned components of an offset.
pub fn check_offset_components(hours: i64, minutes: i64, seconds: i64) -> TempoResult<()> {
    check_range("offset hours", hours, 0..=15)?;
    check_range("offset minutes", minutes, 0..=59)?;
    check_range("offset seconds", seconds, 0..=59)
}

/// Checks a signed total offset in seconds.
pub fn check_offset_seconds(seconds: i64) -> TempoResult<()> {
    check_range("offset", seconds, -MAX_OFFSET_SECONDS..=MAX_OFFSET_SECONDS)
}
