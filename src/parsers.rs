//! This module implements the default textual forms of `Period` and `Offset`.
//!
//! Periods use ISO 8601 durations and offsets use `±HH:MM[:SS]`. Custom
//! `%`-sigil patterns live in [`pattern`].

use crate::{Sign, TempoError, TempoResult};
use core::{iter::Peekable, str::Chars};
use writeable::{impl_display_with_writeable, LengthHint, Writeable};

pub mod pattern;

// ==== Period ====

/// The magnitudes of a single-signed `Period` ready for ISO 8601 output.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FormattablePeriod {
    pub sign: Sign,
    pub years: u64,
    pub months: u64,
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
    /// Microseconds below one second.
    pub fraction: u32,
}

impl FormattablePeriod {
    fn is_zero(&self) -> bool {
        self.years == 0
            && self.months == 0
            && self.days == 0
            && !self.has_time()
    }

    fn has_time(&self) -> bool {
        self.hours != 0 || self.minutes != 0 || self.seconds != 0 || self.fraction != 0
    }
}

impl Writeable for FormattablePeriod {
    fn write_to<W: core::fmt::Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        if self.is_zero() {
            return sink.write_str("PT0S");
        }
        if self.sign == Sign::Negative {
            sink.write_char('-')?;
        }
        sink.write_char('P')?;
        checked_write_u64_with_suffix(self.years, 'Y', sink)?;
        checked_write_u64_with_suffix(self.months, 'M', sink)?;
        checked_write_u64_with_suffix(self.days, 'D', sink)?;
        if !self.has_time() {
            return Ok(());
        }
        sink.write_char('T')?;
        checked_write_u64_with_suffix(self.hours, 'H', sink)?;
        checked_write_u64_with_suffix(self.minutes, 'M', sink)?;
        if self.seconds == 0 && self.fraction == 0 {
            return Ok(());
        }
        self.seconds.write_to(sink)?;
        if self.fraction != 0 {
            sink.write_char('.')?;
            write_trimmed_fraction(self.fraction, sink)?;
        }
        sink.write_char('S')
    }

    fn writeable_length_hint(&self) -> LengthHint {
        LengthHint::at_least(4)
    }
}

fn checked_write_u64_with_suffix<W: core::fmt::Write + ?Sized>(
    val: u64,
    suffix: char,
    sink: &mut W,
) -> core::fmt::Result {
    if val == 0 {
        return Ok(());
    }
    val.write_to(sink)?;
    sink.write_char(suffix)
}

/// Writes six fractional digits without trailing zeros.
fn write_trimmed_fraction<W: core::fmt::Write + ?Sized>(
    microseconds: u32,
    sink: &mut W,
) -> core::fmt::Result {
    let mut value = microseconds;
    let mut width = 6;
    while width > 1 && value % 10 == 0 {
        value /= 10;
        width -= 1;
    }
    write_padded(u64::from(value), width, sink)
}

/// Writes `value` left padded with zeros to at least `width` digits.
pub(crate) fn write_padded<W: core::fmt::Write + ?Sized>(
    value: u64,
    width: usize,
    sink: &mut W,
) -> core::fmt::Result {
    let digits = value.writeable_length_hint().capacity();
    for _ in digits..width {
        sink.write_char('0')?;
    }
    value.write_to(sink)
}

// ==== Offset ====

/// The components of an `Offset` ready for `±HH:MM[:SS]` output.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FormattableOffset {
    pub sign: Sign,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl Writeable for FormattableOffset {
    fn write_to<W: core::fmt::Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        match self.sign {
            Sign::Negative => sink.write_char('-')?,
            _ => sink.write_char('+')?,
        }
        write_padded_u8(self.hour, sink)?;
        sink.write_char(':')?;
        write_padded_u8(self.minute, sink)?;
        if self.second != 0 {
            sink.write_char(':')?;
            write_padded_u8(self.second, sink)?;
        }
        Ok(())
    }

    fn writeable_length_hint(&self) -> LengthHint {
        if self.second == 0 {
            return LengthHint::exact(6);
        }
        LengthHint::exact(9)
    }
}

fn write_padded_u8<W: core::fmt::Write + ?Sized>(num: u8, sink: &mut W) -> core::fmt::Result {
    if num < 10 {
        sink.write_char('0')?;
    }
    num.write_to(sink)
}

impl_display_with_writeable!(FormattablePeriod);
impl_display_with_writeable!(FormattableOffset);

/// Parses `Z`, `±HH`, `±HHMM`, `±HH:MM`, `±HHMMSS` or `±HH:MM:SS` into
/// signed total seconds.
pub(crate) fn parse_offset_seconds(source: &str) -> TempoResult<i64> {
    if source == "Z" || source == "z" {
        return Ok(0);
    }
    let mut cursor = source.chars().peekable();
    let seconds = parse_offset(&mut cursor)?;
    if cursor.next().is_some() {
        return Err(TempoError::syntax().with_message("Unexpected trailing offset characters."));
    }
    Ok(seconds)
}

fn parse_offset(chars: &mut Peekable<Chars<'_>>) -> TempoResult<i64> {
    let sign = match chars.next() {
        Some('+') => 1,
        Some('-') => -1,
        Some(_) => return Err(TempoError::syntax().with_message("Offsets must begin with a sign.")),
        None => return Err(abrupt_end()),
    };
    let hours = parse_digit_pair(chars)?;

    // The separator choice of the minutes portion must repeat for seconds.
    let sep = chars.peek().is_some_and(|ch| *ch == ':');
    let minutes = parse_offset_component(chars, sep, true)?.unwrap_or(0);
    let seconds = parse_offset_component(chars, sep, false)?.unwrap_or(0);

    crate::validate::check_offset_components(hours, minutes, seconds)?;
    Ok(sign * (hours * 3600 + minutes * 60 + seconds))
}

/// Parses an optional `[:]DD` component.
fn parse_offset_component(
    chars: &mut Peekable<Chars<'_>>,
    sep: bool,
    first: bool,
) -> TempoResult<Option<i64>> {
    if chars.peek().is_none() {
        return Ok(None);
    }
    if sep {
        if chars.next() != Some(':') {
            return Err(TempoError::syntax().with_message("Inconsistent offset separators."));
        }
    } else if !first && chars.peek() == Some(&':') {
        return Err(TempoError::syntax().with_message("Inconsistent offset separators."));
    }
    parse_digit_pair(chars).map(Some)
}

fn parse_digit_pair(chars: &mut Peekable<Chars<'_>>) -> TempoResult<i64> {
    let first = parse_digit(chars)?;
    let second = parse_digit(chars)?;
    Ok(first * 10 + second)
}

fn parse_digit(chars: &mut Peekable<Chars<'_>>) -> TempoResult<i64> {
    let ch = chars.next().ok_or_else(abrupt_end)?;
    ch.to_digit(10)
        .map(i64::from)
        .ok_or_else(non_ascii_digit)
}

fn abrupt_end() -> TempoError {
    TempoError::syntax().with_message("Offset ended abruptly.")
}

fn non_ascii_digit() -> TempoError {
    TempoError::syntax().with_message("Offset components must be ASCII digits.")
}
