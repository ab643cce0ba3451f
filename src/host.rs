//! Trait definitions for the host's calendar primitives.
//!
//! NOTE: This is a power user API. `IsoDateTime` implements
//! `CalendarInstant` and is the instant used throughout this crate.

use crate::TempoResult;

/// Microseconds in one day.
pub(crate) const MICROSECONDS_PER_DAY: i128 = 86_400_000_000;

/// A calendar-agnostic span of elapsed time.
///
/// Unlike a `Period`, a `FlatDuration` has no year or month portion and is
/// applied as pure elapsed time.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FlatDuration {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub microseconds: i64,
}

impl FlatDuration {
    /// Returns the total length of this duration in microseconds.
    ///
    /// The total always fits in an `i128`.
    #[must_use]
    pub fn as_microseconds(&self) -> i128 {
        i128::from(self.days) * MICROSECONDS_PER_DAY
            + i128::from(self.hours) * 3_600_000_000
            + i128::from(self.minutes) * 60_000_000
            + i128::from(self.seconds) * 1_000_000
            + i128::from(self.microseconds)
    }

    /// Returns whether every field is zero.
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// The `CalendarInstant` trait describes a point in time with calendar
/// field accessors that a `Period` can be applied to.
pub trait CalendarInstant: Sized {
    fn year(&self) -> i32;
    fn month(&self) -> u8;
    fn day(&self) -> u8;
    fn hour(&self) -> u8;
    fn minute(&self) -> u8;
    fn second(&self) -> u8;
    fn microsecond(&self) -> u32;

    /// Returns the number of days in this instant's month.
    fn days_in_month(&self) -> u8;

    /// Returns a new instant with the date replaced and the time of day kept.
    ///
    /// Months outside of `1..=12` and days outside of the month spill into
    /// the neighbouring months and years, e.g. `2021-02-31` is `2021-03-03`.
    fn with_calendar_fields(&self, year: i64, month: i64, day: i64) -> TempoResult<Self>;

    /// Adds `duration` as elapsed time, or subtracts it when `invert` is set.
    fn add_flat_duration(&self, duration: FlatDuration, invert: bool) -> TempoResult<Self>;
}
