//! This module implements `CalendarAdder`, the calendar-aware application
//! of a `Period` to a `CalendarInstant`.

use crate::{
    builtins::core::Period,
    host::{CalendarInstant, FlatDuration},
    primitive::{checked_add, checked_neg},
    TempoResult,
};

/// The last day of month that exists in every month.
const SHORTEST_MONTH_LENGTH: u8 = 28;

/// Applies a `Period` to a `CalendarInstant`.
///
/// Months are applied first and clamp to the end of the target month, then
/// years are applied and clamp February 29th to February 28th in common
/// years. The remaining fields are applied as elapsed time.
///
/// ```rust
/// use tempo_rs::{iso::IsoDateTime, CalendarAdder, Period};
/// use core::str::FromStr;
///
/// let start = IsoDateTime::try_new(2007, 3, 31, 0, 0, 0, 0).unwrap();
/// let period = Period::from_str("P3M1D").unwrap();
/// let end = CalendarAdder.add(&start, &period).unwrap();
/// assert_eq!((end.date.month, end.date.day), (7, 1));
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CalendarAdder;

impl CalendarAdder {
    /// Returns `instant` moved forward by `period`.
    pub fn add<I: CalendarInstant>(&self, instant: &I, period: &Period) -> TempoResult<I> {
        let after_months = add_months(instant, period.months())?;
        let after_years = add_years(&after_months, period.years())?;
        add_remainder(after_years, period, false)
    }

    /// Returns `instant` moved backward by `period`.
    pub fn subtract<I: CalendarInstant>(&self, instant: &I, period: &Period) -> TempoResult<I> {
        let after_months = add_months(instant, checked_neg(period.months())?)?;
        let after_years = add_years(&after_months, checked_neg(period.years())?)?;
        add_remainder(after_years, period, true)
    }
}

/// Applies the elapsed-time portion of `period`.
fn add_remainder<I: CalendarInstant>(instant: I, period: &Period, invert: bool) -> TempoResult<I> {
    let duration = flat_duration(period);
    if duration.is_zero() {
        return Ok(instant);
    }
    instant.add_flat_duration(duration, invert)
}

fn flat_duration(period: &Period) -> FlatDuration {
    FlatDuration {
        days: period.days(),
        hours: period.hours(),
        minutes: period.minutes(),
        seconds: period.seconds(),
        microseconds: period.microseconds(),
    }
}

/// Adds `months`, clamping to the last day of the target month.
fn add_months<I: CalendarInstant>(instant: &I, months: i64) -> TempoResult<I> {
    let may_spill = instant.day() > SHORTEST_MONTH_LENGTH;
    let result = instant.with_calendar_fields(
        instant.year().into(),
        checked_add(i64::from(instant.month()), months)?,
        instant.day().into(),
    )?;

    // A day past the end of the target month spills into the following month.
    if !may_spill || result.day() >= SHORTEST_MONTH_LENGTH {
        return Ok(result);
    }

    let (year, month) = match result.month() {
        1 => (i64::from(result.year()) - 1, 12),
        month => (i64::from(result.year()), i64::from(month) - 1),
    };
    let start_of_month = result.with_calendar_fields(year, month, 1)?;
    let last_day = start_of_month.days_in_month();
    start_of_month.with_calendar_fields(year, month, last_day.into())
}

/// Adds `years`, clamping February 29th to February 28th.
fn add_years<I: CalendarInstant>(instant: &I, years: i64) -> TempoResult<I> {
    let leap_day = instant.month() == 2 && instant.day() == 29;
    let result = instant.with_calendar_fields(
        checked_add(i64::from(instant.year()), years)?,
        instant.month().into(),
        instant.day().into(),
    )?;

    if leap_day && result.month() == 3 {
        return result.with_calendar_fields(result.year().into(), 2, SHORTEST_MONTH_LENGTH.into());
    }
    Ok(result)
}
