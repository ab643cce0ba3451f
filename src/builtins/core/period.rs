//! This module implements `Period` along with its methods and components.

use crate::{
    builtins::core::calendar::CalendarAdder,
    host::CalendarInstant,
    parsers::{
        pattern::{self, FormattablePattern},
        FormattablePeriod,
    },
    primitive::{checked_add, checked_mul, checked_mul_add, checked_neg, checked_sub},
    Sign, TempoError, TempoResult,
};
use core::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};
use ixdtf::{parsers::IsoDurationParser, records::TimeDurationRecord};
use writeable::Writeable;

pub(crate) mod normalized;
mod scale;

#[cfg(test)]
mod tests;

/// The calendar and clock units of a `Period`, ordered from the largest to
/// the smallest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PeriodUnit {
    Year = 0,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Microsecond,
}

impl PeriodUnit {
    /// Every unit, largest first.
    pub const ALL: [PeriodUnit; 7] = [
        Self::Year,
        Self::Month,
        Self::Day,
        Self::Hour,
        Self::Minute,
        Self::Second,
        Self::Microsecond,
    ];

    #[inline]
    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    /// Returns how many of this unit make up one of the next larger unit,
    /// or `None` for `Year`.
    ///
    /// Months are a nominal 30 days and years a nominal 12 months.
    #[inline]
    #[must_use]
    pub const fn factor(self) -> Option<i64> {
        match self {
            Self::Year => None,
            Self::Month => Some(12),
            Self::Day => Some(30),
            Self::Hour => Some(24),
            Self::Minute | Self::Second => Some(60),
            Self::Microsecond => Some(1_000_000),
        }
    }

    /// Returns the nominal length of one unit in microseconds.
    #[inline]
    #[must_use]
    pub const fn nominal_microseconds(self) -> i128 {
        match self {
            Self::Year => 31_104_000_000_000,
            Self::Month => 2_592_000_000_000,
            Self::Day => 86_400_000_000,
            Self::Hour => 3_600_000_000,
            Self::Minute => 60_000_000,
            Self::Second => 1_000_000,
            Self::Microsecond => 1,
        }
    }
}

impl fmt::Display for PeriodUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Year => "years",
            Self::Month => "months",
            Self::Day => "days",
            Self::Hour => "hours",
            Self::Minute => "minutes",
            Self::Second => "seconds",
            Self::Microsecond => "microseconds",
        }
        .fmt(f)
    }
}

/// A record of named magnitudes used to build or adjust a `Period`.
///
/// Weeks and milliseconds are folded into days and microseconds.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeriodUnits {
    pub years: i64,
    pub months: i64,
    pub weeks: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub milliseconds: i64,
    pub microseconds: i64,
}

/// The right hand side of `Period::plus` and `Period::minus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Magnitude {
    /// An existing `Period`.
    Composite(Period),
    /// Individually named units.
    Units(PeriodUnits),
}

impl From<Period> for Magnitude {
    fn from(value: Period) -> Self {
        Self::Composite(value)
    }
}

impl From<&Period> for Magnitude {
    fn from(value: &Period) -> Self {
        Self::Composite(*value)
    }
}

impl From<PeriodUnits> for Magnitude {
    fn from(value: PeriodUnits) -> Self {
        Self::Units(value)
    }
}

impl Magnitude {
    fn into_period(self) -> TempoResult<Period> {
        match self {
            Self::Composite(period) => Ok(period),
            Self::Units(units) => Period::from_units(units),
        }
    }
}

/// An immutable span of calendar and clock time.
///
/// A `Period` keeps every field exactly as it was produced, so fields are
/// unbounded and may carry mixed signs; `normalized` returns the canonical
/// form. Equality and ordering compare the nominal length of two periods,
/// treating a month as 30 days and a year as 12 months. Use
/// [`Period::is_identical`] to compare the stored fields.
#[non_exhaustive]
#[derive(Debug, Default, Clone, Copy)]
pub struct Period {
    fields: [i64; 7],
}

// ==== Creation ====

impl Period {
    /// Creates a `Period` from its seven stored fields, largest first.
    #[inline]
    #[must_use]
    pub const fn from_fields(fields: [i64; 7]) -> Self {
        Self { fields }
    }

    /// Creates a new `Period`, folding weeks into days and milliseconds
    /// into microseconds.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        years: i64,
        months: i64,
        weeks: i64,
        days: i64,
        hours: i64,
        minutes: i64,
        seconds: i64,
        milliseconds: i64,
        microseconds: i64,
    ) -> TempoResult<Self> {
        Ok(Self::from_fields([
            years,
            months,
            checked_mul_add(weeks, 7, days)?,
            hours,
            minutes,
            seconds,
            checked_mul_add(milliseconds, 1_000, microseconds)?,
        ]))
    }

    /// Creates a new `Period` from a `PeriodUnits` record.
    pub fn from_units(units: PeriodUnits) -> TempoResult<Self> {
        Self::new(
            units.years,
            units.months,
            units.weeks,
            units.days,
            units.hours,
            units.minutes,
            units.seconds,
            units.milliseconds,
            units.microseconds,
        )
    }

    /// Creates a `Period` with a single nonzero field.
    #[inline]
    #[must_use]
    pub fn of(unit: PeriodUnit, value: i64) -> Self {
        let mut fields = [0; 7];
        fields[unit.index()] = value;
        Self::from_fields(fields)
    }
}

// ==== Getters ====

impl Period {
    /// Returns the stored fields, largest first.
    #[inline]
    #[must_use]
    pub const fn fields(&self) -> [i64; 7] {
        self.fields
    }

    /// Returns the stored value of `unit`.
    #[inline]
    #[must_use]
    pub const fn get(&self, unit: PeriodUnit) -> i64 {
        self.fields[unit.index()]
    }

    #[inline]
    #[must_use]
    pub const fn years(&self) -> i64 {
        self.get(PeriodUnit::Year)
    }

    #[inline]
    #[must_use]
    pub const fn months(&self) -> i64 {
        self.get(PeriodUnit::Month)
    }

    #[inline]
    #[must_use]
    pub const fn days(&self) -> i64 {
        self.get(PeriodUnit::Day)
    }

    #[inline]
    #[must_use]
    pub const fn hours(&self) -> i64 {
        self.get(PeriodUnit::Hour)
    }

    #[inline]
    #[must_use]
    pub const fn minutes(&self) -> i64 {
        self.get(PeriodUnit::Minute)
    }

    #[inline]
    #[must_use]
    pub const fn seconds(&self) -> i64 {
        self.get(PeriodUnit::Second)
    }

    #[inline]
    #[must_use]
    pub const fn microseconds(&self) -> i64 {
        self.get(PeriodUnit::Microsecond)
    }

    /// Returns the nominal length of this period in microseconds.
    #[must_use]
    pub fn nominal_microseconds(&self) -> i128 {
        PeriodUnit::ALL
            .iter()
            .map(|unit| i128::from(self.get(*unit)) * unit.nominal_microseconds())
            .sum()
    }
}

// ==== Arithmetic ====

impl Period {
    /// Returns the field-wise sum of this period and `other`.
    ///
    /// The result is not normalized.
    pub fn plus(&self, other: impl Into<Magnitude>) -> TempoResult<Self> {
        let other = other.into().into_period()?;
        self.zip_with(&other, checked_add)
    }

    /// Returns the field-wise difference of this period and `other`.
    ///
    /// The result is not normalized.
    pub fn minus(&self, other: impl Into<Magnitude>) -> TempoResult<Self> {
        let other = other.into().into_period()?;
        self.zip_with(&other, checked_sub)
    }

    /// Returns this period with every field negated.
    pub fn negated(&self) -> TempoResult<Self> {
        self.map(checked_neg)
    }

    /// Returns the absolute value of this period.
    ///
    /// A negative period is negated as a whole; a period that is zero or
    /// positive is returned unchanged, even when its fields have mixed signs.
    pub fn abs(&self) -> TempoResult<Self> {
        if self.is_negative() {
            return self.negated();
        }
        Ok(*self)
    }

    /// Returns this period with every field multiplied by `factor`.
    pub fn multiplied_by(&self, factor: i64) -> TempoResult<Self> {
        self.map(|value| checked_mul(value, factor))
    }

    fn map(&self, f: impl Fn(i64) -> TempoResult<i64>) -> TempoResult<Self> {
        let mut fields = [0; 7];
        for (result, value) in fields.iter_mut().zip(self.fields) {
            *result = f(value)?;
        }
        Ok(Self::from_fields(fields))
    }

    fn zip_with(
        &self,
        other: &Self,
        f: impl Fn(i64, i64) -> TempoResult<i64>,
    ) -> TempoResult<Self> {
        let mut fields = [0; 7];
        for (index, result) in fields.iter_mut().enumerate() {
            *result = f(self.fields[index], other.fields[index])?;
        }
        Ok(Self::from_fields(fields))
    }
}

// ==== Sign and comparison ====

impl Period {
    /// Returns the sign of this period's nominal length.
    #[inline]
    #[must_use]
    pub fn sign(&self) -> Sign {
        Sign::from(self.nominal_microseconds().cmp(&0))
    }

    #[inline]
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.sign() == Sign::Negative
    }

    #[inline]
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.sign() == Sign::Positive
    }

    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.sign() == Sign::Zero
    }

    /// Returns whether any two nonzero fields have opposite signs.
    #[must_use]
    pub fn is_mixed_sign(&self) -> bool {
        let mut seen = 0;
        for value in self.fields {
            let sign = value.signum();
            if sign == 0 {
                continue;
            }
            if seen != 0 && sign != seen {
                return true;
            }
            seen = sign;
        }
        false
    }

    /// Compares the nominal length of two periods.
    #[inline]
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        self.nominal_microseconds().cmp(&other.nominal_microseconds())
    }

    /// Returns whether both periods store exactly the same fields.
    #[inline]
    #[must_use]
    pub fn is_identical(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

impl PartialEq for Period {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl Eq for Period {}

impl PartialOrd for Period {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Period {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl Hash for Period {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.nominal_microseconds().hash(state);
    }
}

// ==== Calendar arithmetic ====

impl Period {
    /// Adds this period to `instant`, clamping to the end of the month.
    pub fn add_to<I: CalendarInstant>(&self, instant: &I) -> TempoResult<I> {
        CalendarAdder.add(instant, self)
    }

    /// Subtracts this period from `instant`, clamping to the end of the month.
    pub fn subtract_from<I: CalendarInstant>(&self, instant: &I) -> TempoResult<I> {
        CalendarAdder.subtract(instant, self)
    }
}

// ==== Text ====

impl Period {
    /// Renders this period with a `%`-sigil pattern.
    ///
    /// ```rust
    /// use tempo_rs::Period;
    ///
    /// let period = Period::new(0, 0, 0, 3, 4, 5, 6, 0, 0).unwrap();
    /// assert_eq!(period.format("%dd %H:%I:%S"), "3d 04:05:06");
    /// assert_eq!(Period::parse("3d 04:05:06", "%dd %H:%I:%S").unwrap(), period);
    /// ```
    ///
    /// Mixed-sign periods are rendered in their normalized form, and whole
    /// seconds held in the microsecond field are rendered as seconds.
    #[must_use]
    pub fn format(&self, pattern: &str) -> String {
        FormattablePattern::new(&self.pattern_form(), pattern)
            .write_to_string()
            .into_owned()
    }

    /// Parses `source` with a `%`-sigil pattern.
    pub fn parse(source: &str, pattern: &str) -> TempoResult<Self> {
        pattern::parse(source, pattern)
    }

    /// Returns the ISO 8601 duration representation of this period.
    ///
    /// Mixed-sign periods are rendered in their normalized form.
    #[must_use]
    pub fn to_ixdtf_string(&self) -> String {
        self.to_formattable().write_to_string().into_owned()
    }

    /// Returns the single-signed form used for text output.
    ///
    /// A mixed-sign period whose normalization overflows keeps its fields,
    /// and its text then shows every field under the sign of the total.
    fn display_form(&self) -> Self {
        if self.is_mixed_sign() {
            return self.normalized().unwrap_or(*self);
        }
        *self
    }

    /// Returns the display form with whole seconds moved out of the
    /// microsecond field.
    fn pattern_form(&self) -> Self {
        let mut period = self.display_form();
        let microseconds = period.microseconds();
        if let Ok(seconds) = checked_add(period.seconds(), microseconds / 1_000_000) {
            period.fields[PeriodUnit::Second.index()] = seconds;
            period.fields[PeriodUnit::Microsecond.index()] = microseconds % 1_000_000;
        }
        period
    }

    fn to_formattable(&self) -> FormattablePeriod {
        let period = self.display_form();
        let microseconds = period.microseconds().unsigned_abs();
        FormattablePeriod {
            sign: period.sign(),
            years: period.years().unsigned_abs(),
            months: period.months().unsigned_abs(),
            days: period.days().unsigned_abs(),
            hours: period.hours().unsigned_abs(),
            minutes: period.minutes().unsigned_abs(),
            seconds: period.seconds().unsigned_abs() + microseconds / 1_000_000,
            // NOTE: the remainder is below one million.
            fraction: (microseconds % 1_000_000) as u32,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_formattable().write_to(f)
    }
}

// ==== FromStr trait impl ====

const NANOSECONDS_PER_MINUTE: u64 = 60 * 1_000_000_000;

impl FromStr for Period {
    type Err = TempoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_record = IsoDurationParser::from_str(s)
            .parse()
            .map_err(|e| TempoError::syntax().with_message(format!("{e}")))?;

        // Fractional hours and minutes are distributed down to whole
        // microseconds.
        let (hours, minutes, seconds, fraction_ns) = match parse_record.time {
            Some(TimeDurationRecord::Hours { hours, fraction }) => {
                let fractional_hours_ns = fraction_nanoseconds(fraction)? * 3600;
                let minutes = fractional_hours_ns.div_euclid(NANOSECONDS_PER_MINUTE);
                let fractional_minutes_ns = fractional_hours_ns.rem_euclid(NANOSECONDS_PER_MINUTE);
                let seconds = fractional_minutes_ns.div_euclid(1_000_000_000);
                let fractional_seconds = fractional_minutes_ns.rem_euclid(1_000_000_000);
                (to_field(hours)?, minutes as i64, seconds as i64, fractional_seconds)
            }
            Some(TimeDurationRecord::Minutes {
                hours,
                minutes,
                fraction,
            }) => {
                let fractional_minutes_ns = fraction_nanoseconds(fraction)? * 60;
                let seconds = fractional_minutes_ns.div_euclid(1_000_000_000);
                let fractional_seconds = fractional_minutes_ns.rem_euclid(1_000_000_000);
                (to_field(hours)?, to_field(minutes)?, seconds as i64, fractional_seconds)
            }
            Some(TimeDurationRecord::Seconds {
                hours,
                minutes,
                seconds,
                fraction,
            }) => (
                to_field(hours)?,
                to_field(minutes)?,
                to_field(seconds)?,
                fraction_nanoseconds(fraction)?,
            ),
            None => (0, 0, 0, 0),
        };

        if fraction_ns % 1_000 != 0 {
            return Err(TempoError::range()
                .with_message("periods cannot represent sub-microsecond fractions."));
        }
        let microseconds = (fraction_ns / 1_000) as i64;

        let (years, months, weeks, days) = if let Some(date) = parse_record.date {
            (
                to_field(date.years)?,
                to_field(date.months)?,
                to_field(date.weeks)?,
                to_field(date.days)?,
            )
        } else {
            (0, 0, 0, 0)
        };

        let period = Self::new(
            years,
            months,
            weeks,
            days,
            hours,
            minutes,
            seconds,
            0,
            microseconds,
        )?;

        if parse_record.sign as i8 == -1 {
            return period.negated();
        }
        Ok(period)
    }
}

fn fraction_nanoseconds(fraction: Option<ixdtf::records::Fraction>) -> TempoResult<u64> {
    match fraction {
        None => Ok(0),
        Some(fraction) => fraction.to_nanoseconds().map(u64::from).ok_or_else(|| {
            TempoError::range()
                .with_message("periods cannot represent sub-microsecond fractions.")
        }),
    }
}

fn to_field<T>(value: T) -> TempoResult<i64>
where
    T: TryInto<i64> + Copy + fmt::Display,
{
    value.try_into().map_err(|_| {
        TempoError::overflow().with_message(format!("{value} does not fit in a period field"))
    })
}
