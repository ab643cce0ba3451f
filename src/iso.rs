//! This module implements the ISO calendar records.
//!
//! The three record types are:
//!   - `IsoDateTime`
//!   - `IsoDate`
//!   - `IsoTime`
//!
//! An `IsoDate` is a proleptic Gregorian year, month and day. An `IsoTime`
//! is a wall-clock time with microsecond precision. An `IsoDateTime` is both,
//! and is this crate's implementation of `CalendarInstant`.

use crate::{
    host::{CalendarInstant, FlatDuration, MICROSECONDS_PER_DAY},
    primitive::{checked_add, checked_sub},
    utils, validate, TempoError, TempoResult,
};

const MICROSECONDS_PER_HOUR: i64 = 3_600_000_000;
const MICROSECONDS_PER_MINUTE: i64 = 60_000_000;
const MICROSECONDS_PER_SECOND: i64 = 1_000_000;

/// `IsoDateTime` is the record of an `IsoDate` and an `IsoTime`.
#[non_exhaustive]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IsoDateTime {
    pub date: IsoDate,
    pub time: IsoTime,
}

impl IsoDateTime {
    /// Creates a new `IsoDateTime` without any validation.
    pub(crate) const fn new_unchecked(date: IsoDate, time: IsoTime) -> Self {
        Self { date, time }
    }

    /// Creates a new `IsoDateTime` from already validated records.
    #[inline]
    #[must_use]
    pub const fn new(date: IsoDate, time: IsoTime) -> Self {
        Self::new_unchecked(date, time)
    }

    /// Creates a new validated `IsoDateTime` from its fields.
    #[allow(clippy::too_many_arguments)]
    pub fn try_new(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        microsecond: u32,
    ) -> TempoResult<Self> {
        Ok(Self::new_unchecked(
            IsoDate::try_new(year, month, day)?,
            IsoTime::try_new(hour, minute, second, microsecond)?,
        ))
    }

    /// Balances the provided values into a valid `IsoDateTime`.
    ///
    /// Time of day overflow is carried into the day, and day overflow into
    /// the month and year.
    #[allow(clippy::too_many_arguments)]
    pub fn balance(
        year: i64,
        month: i64,
        day: i64,
        hour: i64,
        minute: i64,
        second: i64,
        microsecond: i64,
    ) -> TempoResult<Self> {
        let (overflow_day, time) = IsoTime::balance(hour, minute, second, microsecond)?;
        let date = IsoDate::balance(year, month, checked_add(day, overflow_day)?)?;
        Ok(Self::new_unchecked(date, time))
    }

    /// Adds `microseconds` of elapsed time.
    pub(crate) fn add_microseconds(&self, microseconds: i128) -> TempoResult<Self> {
        let total = i128::from(self.date.to_epoch_days()) * MICROSECONDS_PER_DAY
            + i128::from(self.time.to_microseconds())
            + microseconds;
        let epoch_days = total.div_euclid(MICROSECONDS_PER_DAY);
        let time_of_day = total.rem_euclid(MICROSECONDS_PER_DAY);
        let epoch_days = i64::try_from(epoch_days)
            .map_err(|_| TempoError::range().with_message("date is outside of the ISO range."))?;
        // NOTE: rem_euclid keeps the time of day below one day.
        let (_, time) = IsoTime::balance(0, 0, 0, time_of_day as i64)?;
        Ok(Self::new_unchecked(IsoDate::from_epoch_days(epoch_days)?, time))
    }
}

impl CalendarInstant for IsoDateTime {
    fn year(&self) -> i32 {
        self.date.year
    }

    fn month(&self) -> u8 {
        self.date.month
    }

    fn day(&self) -> u8 {
        self.date.day
    }

    fn hour(&self) -> u8 {
        self.time.hour
    }

    fn minute(&self) -> u8 {
        self.time.minute
    }

    fn second(&self) -> u8 {
        self.time.second
    }

    fn microsecond(&self) -> u32 {
        self.time.microsecond
    }

    fn days_in_month(&self) -> u8 {
        self.date.days_in_month()
    }

    fn with_calendar_fields(&self, year: i64, month: i64, day: i64) -> TempoResult<Self> {
        Ok(Self::new_unchecked(
            IsoDate::balance(year, month, day)?,
            self.time,
        ))
    }

    fn add_flat_duration(&self, duration: FlatDuration, invert: bool) -> TempoResult<Self> {
        let microseconds = duration.as_microseconds();
        self.add_microseconds(if invert { -microseconds } else { microseconds })
    }
}

// ==== `IsoDate` section ====

/// `IsoDate` serves as a record for a year, month, and day.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IsoDate {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

impl Default for IsoDate {
    fn default() -> Self {
        Self::new_unchecked(1970, 1, 1)
    }
}

impl IsoDate {
    /// Creates a new `IsoDate` without determining the validity.
    pub(crate) const fn new_unchecked(year: i32, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    /// Creates a new validated `IsoDate`.
    pub fn try_new(year: i32, month: u8, day: u8) -> TempoResult<Self> {
        validate::check_day(year, month, day.into())?;
        Ok(Self::new_unchecked(year, month, day))
    }

    /// Create a balanced `IsoDate`.
    ///
    /// Months outside of `1..=12` roll into the year, and days outside of
    /// the month roll into the following or preceding months.
    pub fn balance(year: i64, month: i64, day: i64) -> TempoResult<Self> {
        let (year, month) = utils::balance_iso_year_month(year, month);
        let year = i64::try_from(year)
            .map_err(|_| TempoError::range().with_message("year is outside of the ISO range."))?;
        validate::check_year(year)?;
        let first_of_month = utils::iso_date_to_epoch_days(year, month, 1);
        let epoch_days = checked_add(first_of_month, checked_sub(day, 1)?)?;
        Self::from_epoch_days(epoch_days)
    }

    /// Creates an `IsoDate` from days since 1970-01-01.
    pub fn from_epoch_days(epoch_days: i64) -> TempoResult<Self> {
        let min = utils::iso_date_to_epoch_days(i32::MIN.into(), 1, 1);
        let max = utils::iso_date_to_epoch_days(i32::MAX.into(), 12, 31);
        validate::check_range("epoch days", epoch_days, min..=max)?;
        let (year, month, day) = utils::epoch_days_to_iso_date(epoch_days);
        // NOTE: the epoch day range check keeps the year within `i32`.
        Ok(Self::new_unchecked(year as i32, month, day))
    }

    /// Returns the days since 1970-01-01.
    #[inline]
    #[must_use]
    pub fn to_epoch_days(self) -> i64 {
        utils::iso_date_to_epoch_days(self.year.into(), self.month, self.day.into())
    }

    /// Returns the number of days in this date's month.
    #[inline]
    #[must_use]
    pub fn days_in_month(self) -> u8 {
        utils::iso_days_in_month(self.year, self.month)
    }
}

// ==== `IsoTime` section ====

/// An `IsoTime` record with microsecond precision.
#[non_exhaustive]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IsoTime {
    pub hour: u8,         // 0..=23
    pub minute: u8,       // 0..=59
    pub second: u8,       // 0..=59
    pub microsecond: u32, // 0..=999_999
}

impl IsoTime {
    /// Creates a new `IsoTime` without any validation.
    pub(crate) const fn new_unchecked(hour: u8, minute: u8, second: u8, microsecond: u32) -> Self {
        Self {
            hour,
            minute,
            second,
            microsecond,
        }
    }

    /// Creates a new validated `IsoTime`.
    pub fn try_new(hour: u8, minute: u8, second: u8, microsecond: u32) -> TempoResult<Self> {
        validate::check_hour(hour.into())?;
        validate::check_minute(minute.into())?;
        validate::check_second(second.into())?;
        validate::check_microsecond(microsecond.into())?;
        Ok(Self::new_unchecked(hour, minute, second, microsecond))
    }

    /// Balances the provided values into an `IsoTime` and the number of
    /// whole days that overflowed.
    pub fn balance(
        hour: i64,
        minute: i64,
        second: i64,
        microsecond: i64,
    ) -> TempoResult<(i64, Self)> {
        let total = i128::from(hour) * i128::from(MICROSECONDS_PER_HOUR)
            + i128::from(minute) * i128::from(MICROSECONDS_PER_MINUTE)
            + i128::from(second) * i128::from(MICROSECONDS_PER_SECOND)
            + i128::from(microsecond);

        let days = i64::try_from(total.div_euclid(MICROSECONDS_PER_DAY))
            .map_err(|_| TempoError::range().with_message("time overflowed the day range."))?;
        // NOTE: every value below is bounded by the divisions that produce it.
        let rest = total.rem_euclid(MICROSECONDS_PER_DAY) as i64;

        let (hour, rest) = div_mod(rest, MICROSECONDS_PER_HOUR);
        let (minute, rest) = div_mod(rest, MICROSECONDS_PER_MINUTE);
        let (second, microsecond) = div_mod(rest, MICROSECONDS_PER_SECOND);

        let time = Self::new_unchecked(
            hour as u8,
            minute as u8,
            second as u8,
            microsecond as u32,
        );
        Ok((days, time))
    }

    /// Returns the microseconds elapsed since midnight.
    #[inline]
    #[must_use]
    pub fn to_microseconds(self) -> i64 {
        i64::from(self.hour) * MICROSECONDS_PER_HOUR
            + i64::from(self.minute) * MICROSECONDS_PER_MINUTE
            + i64::from(self.second) * MICROSECONDS_PER_SECOND
            + i64::from(self.microsecond)
    }
}

#[inline]
fn div_mod(dividend: i64, divisor: i64) -> (i64, i64) {
    (dividend.div_euclid(divisor), dividend.rem_euclid(divisor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn datetime(year: i32, month: u8, day: u8, hour: u8, minute: u8) -> IsoDateTime {
        IsoDateTime::try_new(year, month, day, hour, minute, 0, 0).unwrap()
    }

    #[test]
    fn validated_construction() {
        assert!(IsoDate::try_new(2020, 2, 29).is_ok());
        assert_eq!(
            IsoDate::try_new(2021, 2, 29).unwrap_err().kind(),
            ErrorKind::Range
        );
        assert!(IsoTime::try_new(24, 0, 0, 0).is_err());
        assert!(IsoTime::try_new(23, 59, 59, 1_000_000).is_err());
    }

    #[test]
    fn balance_spills_into_next_month() {
        assert_eq!(
            IsoDate::balance(2021, 2, 31).unwrap(),
            IsoDate::new_unchecked(2021, 3, 3)
        );
        assert_eq!(
            IsoDate::balance(2020, 2, 31).unwrap(),
            IsoDate::new_unchecked(2020, 3, 2)
        );
        assert_eq!(
            IsoDate::balance(2021, 14, 0).unwrap(),
            IsoDate::new_unchecked(2022, 1, 31)
        );
        assert_eq!(
            IsoDate::balance(2021, 1, -30).unwrap(),
            IsoDate::new_unchecked(2020, 12, 1)
        );
        assert_eq!(
            IsoDate::balance(i64::from(i32::MAX) + 1, 1, 1).unwrap_err().kind(),
            ErrorKind::Range
        );
    }

    #[test]
    fn time_balance_carries_days() {
        let (days, time) = IsoTime::balance(25, 0, 0, 0).unwrap();
        assert_eq!(days, 1);
        assert_eq!(time, IsoTime::new_unchecked(1, 0, 0, 0));

        let (days, time) = IsoTime::balance(0, 0, 0, -1).unwrap();
        assert_eq!(days, -1);
        assert_eq!(time, IsoTime::new_unchecked(23, 59, 59, 999_999));

        let dt = IsoDateTime::balance(2021, 12, 31, 23, 59, 60, 0).unwrap();
        assert_eq!(dt, datetime(2022, 1, 1, 0, 0));
    }

    #[test]
    fn flat_duration_is_elapsed_time() {
        let start = datetime(2021, 12, 31, 22, 30);
        let duration = FlatDuration {
            hours: 2,
            minutes: 15,
            ..Default::default()
        };

        let later = start.add_flat_duration(duration, false).unwrap();
        assert_eq!(later, datetime(2022, 1, 1, 0, 45));

        let earlier = later.add_flat_duration(duration, true).unwrap();
        assert_eq!(earlier, start);

        let days = FlatDuration {
            days: 366,
            ..Default::default()
        };
        let leap = datetime(2020, 1, 1, 0, 0).add_flat_duration(days, false).unwrap();
        assert_eq!(leap, datetime(2021, 1, 1, 0, 0));
    }

    #[test]
    fn calendar_fields_keep_time_of_day() {
        let start = IsoDateTime::try_new(2021, 1, 31, 13, 14, 15, 16).unwrap();
        let moved = start.with_calendar_fields(2021, 2, 31).unwrap();
        assert_eq!(moved.date, IsoDate::new_unchecked(2021, 3, 3));
        assert_eq!(moved.time, start.time);
        assert_eq!(moved.days_in_month(), 31);
    }
}
