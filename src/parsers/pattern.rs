//! `%`-sigil patterns for `Period` and `Offset`.
//!
//! A pattern is literal text interleaved with two character sigils, a `%`
//! followed by a letter. Formatting substitutes each recognized sigil and
//! writes anything else verbatim. Parsing compiles the pattern into an
//! anchored regular expression with one capture group per sigil.
//!
//! | Sigil | `Period` | `Offset` |
//! |---|---|---|
//! | `%R` / `%r` | sign, `+`/`-` / `-` or nothing | same |
//! | `%y` / `%Y` | years | |
//! | `%m` / `%M` | months | |
//! | `%w` / `%W` | whole weeks of the days | |
//! | `%e` / `%E` | days left over after weeks | |
//! | `%d` / `%D` | days | |
//! | `%h` / `%H` | hours | hours |
//! | `%i` / `%I` | minutes | minutes |
//! | `%s` / `%S` | seconds | seconds |
//! | `%f` / `%F` | `.NNN` / `.NNNNNN` fraction of a second, empty when zero | |
//! | `%v` / `%V` | whole milliseconds of the microseconds, 3 digits when upper | |
//! | `%u` / `%U` | microseconds left over after milliseconds, 3 digits when upper | |
//! | `%%` | `%` | `%` |
//!
//! Upper case numeric sigils are padded to two digits unless noted.

use crate::{
    builtins::core::{Offset, Period, PeriodUnit, PeriodUnits},
    parsers::write_padded,
    validate, TempoError, TempoResult,
};
use regex::Regex;
use writeable::{LengthHint, Writeable};

/// A lexical element of a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Literal(&'a str),
    Sigil(char),
    /// A `%` at the very end of the pattern.
    Dangling,
}

/// Splits a pattern into literal runs and sigils.
#[derive(Debug, Clone)]
struct Tokens<'a> {
    rest: &'a str,
}

impl<'a> Tokens<'a> {
    fn new(pattern: &'a str) -> Self {
        Self { rest: pattern }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        if let Some(after) = self.rest.strip_prefix('%') {
            let mut chars = after.chars();
            let token = match chars.next() {
                None => Token::Dangling,
                Some('%') => Token::Literal("%"),
                Some(symbol) => Token::Sigil(symbol),
            };
            self.rest = chars.as_str();
            return Some(token);
        }
        let end = self.rest.find('%').unwrap_or(self.rest.len());
        let (literal, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(Token::Literal(literal))
    }
}

/// The text a sigil matches when parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    /// `[+-]` when required, otherwise an optional `-`.
    Sign { required: bool },
    /// At least `width` ASCII digits.
    Digits { width: usize },
    /// An optional `.` followed by one to six digits.
    Fraction,
}

impl Capture {
    fn expression(self) -> String {
        match self {
            Self::Sign { required: true } => "([+-])".into(),
            Self::Sign { required: false } => "(-?)".into(),
            Self::Digits { width: 1 } => "([0-9]+)".into(),
            Self::Digits { width } => format!("([0-9]{{{width},}})"),
            Self::Fraction => r"(?:\.([0-9]{1,6}))?".into(),
        }
    }
}

/// The description of a recognized sigil.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sigil {
    /// The quantities the sigil names, as bit flags. Two sigils of one
    /// pattern may not share a flag.
    pub quantity: u16,
    pub capture: Capture,
}

impl Sigil {
    const fn new(quantity: u16, capture: Capture) -> Self {
        Self { quantity, capture }
    }

    const fn digits(quantity: u16, width: usize) -> Self {
        Self::new(quantity, Capture::Digits { width })
    }
}

/// The values matched by a pattern.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Captures {
    /// Whether a sign sigil matched `-`.
    pub negative: bool,
    /// Each field sigil with its unsigned value. Fractions are given in
    /// microseconds.
    pub values: Vec<(char, u64)>,
}

/// A value that can be written and read with a `%`-sigil pattern.
pub trait PatternSubject: Sized {
    /// Describes `symbol`, or returns `None` when it is not a sigil.
    fn sigil(symbol: char) -> Option<Sigil>;

    /// Writes the value of a recognized sigil.
    fn write_sigil<W: core::fmt::Write + ?Sized>(&self, symbol: char, sink: &mut W)
        -> core::fmt::Result;

    /// Builds a value from the captures of a successful match.
    fn from_captures(captures: &Captures) -> TempoResult<Self>;
}

/// A value paired with the pattern it is written with.
#[derive(Debug)]
pub struct FormattablePattern<'a, T> {
    value: &'a T,
    pattern: &'a str,
}

impl<'a, T: PatternSubject> FormattablePattern<'a, T> {
    #[must_use]
    pub fn new(value: &'a T, pattern: &'a str) -> Self {
        Self { value, pattern }
    }
}

impl<T: PatternSubject> Writeable for FormattablePattern<'_, T> {
    fn write_to<W: core::fmt::Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        for token in Tokens::new(self.pattern) {
            match token {
                Token::Literal(text) => sink.write_str(text)?,
                Token::Dangling => sink.write_char('%')?,
                Token::Sigil(symbol) if T::sigil(symbol).is_some() => {
                    self.value.write_sigil(symbol, sink)?;
                }
                Token::Sigil(symbol) => {
                    sink.write_char('%')?;
                    sink.write_char(symbol)?;
                }
            }
        }
        Ok(())
    }

    fn writeable_length_hint(&self) -> LengthHint {
        LengthHint::undefined()
    }
}

/// Parses `source` with `pattern`.
///
/// The whole of `source` must match. The matched sign applies to every
/// captured field.
pub fn parse<T: PatternSubject>(source: &str, pattern: &str) -> TempoResult<T> {
    let mut expression = String::from(r"\A");
    let mut groups = Vec::new();
    let mut claimed = 0;

    for token in Tokens::new(pattern) {
        match token {
            Token::Literal(text) => expression.push_str(&regex::escape(text)),
            Token::Dangling => {
                return Err(TempoError::parse_mismatch(source, pattern)
                    .with_message(format!("\"{pattern}\" ends with a dangling %")));
            }
            Token::Sigil(symbol) => {
                let sigil = T::sigil(symbol).ok_or_else(|| {
                    TempoError::parse_mismatch(source, pattern)
                        .with_message(format!("unknown sigil %{symbol} in \"{pattern}\""))
                })?;
                if claimed & sigil.quantity != 0 {
                    return Err(TempoError::usage().with_message(format!(
                        "%{symbol} names a quantity already present in \"{pattern}\""
                    )));
                }
                claimed |= sigil.quantity;
                expression.push_str(&sigil.capture.expression());
                groups.push((symbol, sigil.capture));
            }
        }
    }

    if groups
        .iter()
        .all(|(_, capture)| matches!(capture, Capture::Sign { .. }))
    {
        return Err(TempoError::parse_mismatch(source, pattern)
            .with_message(format!("\"{pattern}\" does not name any field")));
    }
    expression.push_str(r"\z");

    let regex = Regex::new(&expression).map_err(|e| {
        TempoError::parse_mismatch(source, pattern).with_message(format!("{e}"))
    })?;
    let matched = regex
        .captures(source)
        .ok_or_else(|| TempoError::parse_mismatch(source, pattern))?;

    let mut captures = Captures::default();
    for (index, (symbol, capture)) in groups.into_iter().enumerate() {
        let text = matched.get(index + 1).map_or("", |m| m.as_str());
        match capture {
            Capture::Sign { .. } => captures.negative = text == "-",
            Capture::Digits { .. } => captures.values.push((symbol, parse_digits(text)?)),
            Capture::Fraction => captures.values.push((symbol, parse_fraction(text)?)),
        }
    }

    T::from_captures(&captures)
}

fn parse_digits(text: &str) -> TempoResult<u64> {
    text.parse().map_err(|_| {
        TempoError::overflow().with_message(format!("{text} does not fit in a 64-bit field"))
    })
}

/// Reads up to six fractional digits as microseconds.
fn parse_fraction(text: &str) -> TempoResult<u64> {
    if text.is_empty() {
        return Ok(0);
    }
    parse_digits(&format!("{text:0<6}"))
}

fn to_signed(value: u64) -> TempoResult<i64> {
    i64::try_from(value).map_err(|_| {
        TempoError::overflow().with_message(format!("{value} does not fit in a 64-bit field"))
    })
}

fn write_sign<W: core::fmt::Write + ?Sized>(
    negative: bool,
    required: bool,
    sink: &mut W,
) -> core::fmt::Result {
    match (negative, required) {
        (true, _) => sink.write_char('-'),
        (false, true) => sink.write_char('+'),
        (false, false) => Ok(()),
    }
}

// ==== Period sigils ====

const YEARS: u16 = 1;
const MONTHS: u16 = 1 << 1;
const WEEKS: u16 = 1 << 2;
const LEFTOVER_DAYS: u16 = 1 << 3;
const HOURS: u16 = 1 << 4;
const MINUTES: u16 = 1 << 5;
const SECONDS: u16 = 1 << 6;
const MILLISECONDS: u16 = 1 << 7;
const LEFTOVER_MICROSECONDS: u16 = 1 << 8;
const SIGN: u16 = 1 << 9;

const fn sign_sigil(symbol: char) -> Option<Sigil> {
    match symbol {
        'R' => Some(Sigil::new(SIGN, Capture::Sign { required: true })),
        'r' => Some(Sigil::new(SIGN, Capture::Sign { required: false })),
        _ => None,
    }
}

impl PatternSubject for Period {
    fn sigil(symbol: char) -> Option<Sigil> {
        let width = if symbol.is_ascii_uppercase() { 2 } else { 1 };
        let sigil = match symbol {
            'y' | 'Y' => Sigil::digits(YEARS, width),
            'm' | 'M' => Sigil::digits(MONTHS, width),
            'w' | 'W' => Sigil::digits(WEEKS, width),
            'e' | 'E' => Sigil::digits(LEFTOVER_DAYS, width),
            'd' | 'D' => Sigil::digits(WEEKS | LEFTOVER_DAYS, width),
            'h' | 'H' => Sigil::digits(HOURS, width),
            'i' | 'I' => Sigil::digits(MINUTES, width),
            's' | 'S' => Sigil::digits(SECONDS, width),
            'f' | 'F' => Sigil::new(MILLISECONDS | LEFTOVER_MICROSECONDS, Capture::Fraction),
            'v' => Sigil::digits(MILLISECONDS, 1),
            'V' => Sigil::digits(MILLISECONDS, 3),
            'u' => Sigil::digits(LEFTOVER_MICROSECONDS, 1),
            'U' => Sigil::digits(LEFTOVER_MICROSECONDS, 3),
            _ => return sign_sigil(symbol),
        };
        Some(sigil)
    }

    fn write_sigil<W: core::fmt::Write + ?Sized>(
        &self,
        symbol: char,
        sink: &mut W,
    ) -> core::fmt::Result {
        let magnitude = |unit: PeriodUnit| self.get(unit).unsigned_abs();
        let days = magnitude(PeriodUnit::Day);
        let microseconds = magnitude(PeriodUnit::Microsecond);
        let fraction = microseconds % 1_000_000;

        let pad = if symbol.is_ascii_uppercase() { 2 } else { 1 };

        let (value, width) = match symbol {
            'R' | 'r' => return write_sign(self.is_negative(), symbol == 'R', sink),
            'f' => {
                if fraction / 1_000 == 0 {
                    return Ok(());
                }
                sink.write_char('.')?;
                (fraction / 1_000, 3)
            }
            'F' => {
                if fraction == 0 {
                    return Ok(());
                }
                sink.write_char('.')?;
                (fraction, 6)
            }
            'y' | 'Y' => (magnitude(PeriodUnit::Year), pad),
            'm' | 'M' => (magnitude(PeriodUnit::Month), pad),
            'w' | 'W' => (days / 7, pad),
            'e' | 'E' => (days % 7, pad),
            'd' | 'D' => (days, pad),
            'h' | 'H' => (magnitude(PeriodUnit::Hour), pad),
            'i' | 'I' => (magnitude(PeriodUnit::Minute), pad),
            's' | 'S' => (magnitude(PeriodUnit::Second), pad),
            'v' => (microseconds / 1_000, 1),
            'V' => (microseconds / 1_000, 3),
            'u' => (microseconds % 1_000, 1),
            'U' => (microseconds % 1_000, 3),
            // NOTE: unrecognized sigils are written by the caller.
            _ => return Ok(()),
        };
        write_padded(value, width, sink)
    }

    fn from_captures(captures: &Captures) -> TempoResult<Self> {
        let mut units = PeriodUnits::default();
        for &(symbol, value) in &captures.values {
            let value = to_signed(value)?;
            match symbol {
                'y' | 'Y' => units.years = value,
                'm' | 'M' => units.months = value,
                'w' | 'W' => units.weeks = value,
                'e' | 'E' | 'd' | 'D' => units.days = value,
                'h' | 'H' => units.hours = value,
                'i' | 'I' => units.minutes = value,
                's' | 'S' => units.seconds = value,
                'v' | 'V' => units.milliseconds = value,
                'f' | 'F' | 'u' | 'U' => units.microseconds = value,
                _ => {}
            }
        }
        let period = Period::from_units(units)?;
        if captures.negative {
            return period.negated();
        }
        Ok(period)
    }
}

// ==== Offset sigils ====

const OFFSET_HOURS: u16 = 1;
const OFFSET_MINUTES: u16 = 1 << 1;
const OFFSET_SECONDS: u16 = 1 << 2;

impl PatternSubject for Offset {
    fn sigil(symbol: char) -> Option<Sigil> {
        let width = if symbol.is_ascii_uppercase() { 2 } else { 1 };
        let sigil = match symbol {
            'h' | 'H' => Sigil::digits(OFFSET_HOURS, width),
            'i' | 'I' => Sigil::digits(OFFSET_MINUTES, width),
            's' | 'S' => Sigil::digits(OFFSET_SECONDS, width),
            _ => return sign_sigil(symbol),
        };
        Some(sigil)
    }

    fn write_sigil<W: core::fmt::Write + ?Sized>(
        &self,
        symbol: char,
        sink: &mut W,
    ) -> core::fmt::Result {
        let value = match symbol {
            'R' | 'r' => return write_sign(self.total_seconds() < 0, symbol == 'R', sink),
            'h' | 'H' => self.hour(),
            'i' | 'I' => self.minute(),
            's' | 'S' => self.second(),
            // NOTE: unrecognized sigils are written by the caller.
            _ => return Ok(()),
        };
        let width = if symbol.is_ascii_uppercase() { 2 } else { 1 };
        write_padded(value.into(), width, sink)
    }

    fn from_captures(captures: &Captures) -> TempoResult<Self> {
        let (mut hours, mut minutes, mut seconds) = (0, 0, 0);
        for &(symbol, value) in &captures.values {
            let value = to_signed(value)?;
            match symbol {
                'h' | 'H' => hours = value,
                'i' | 'I' => minutes = value,
                's' | 'S' => seconds = value,
                _ => {}
            }
        }
        validate::check_offset_components(hours, minutes, seconds)?;
        let total = hours * 3600 + minutes * 60 + seconds;
        Offset::from_seconds(if captures.negative { -total } else { total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorContext, ErrorKind};

    fn period(fields: [i64; 7]) -> Period {
        Period::from_fields(fields)
    }

    #[test]
    fn tokens() {
        let tokens: Vec<_> = Tokens::new("a%Yb%%c%").collect();
        assert_eq!(
            tokens,
            [
                Token::Literal("a"),
                Token::Sigil('Y'),
                Token::Literal("b"),
                Token::Literal("%"),
                Token::Literal("c"),
                Token::Dangling,
            ]
        );
    }

    #[test]
    fn period_format() {
        let p = period([1, 2, 10, 3, 4, 5, 6_007]);
        assert_eq!(p.format("%y-%M %D"), "1-02 10");
        assert_eq!(p.format("%ww%ed"), "1w3d");
        assert_eq!(p.format("%H:%I:%S%F"), "03:04:05.006007");
        assert_eq!(p.format("%s%f"), "5.006");
        assert_eq!(p.format("%vms %uus / %V.%U"), "6ms 7us / 006.007");
        assert_eq!(p.format("%R%d"), "+10");
        assert_eq!(p.format("%r%d"), "10");
        assert_eq!(p.format("100%% %q %"), "100% %q %");
        assert_eq!(period([0; 7]).format("%S%F%f"), "00");
    }

    #[test]
    fn whole_seconds_in_microseconds_are_formatted() {
        let p = period([0, 0, 0, 0, 0, 5, 1_500_000]);
        assert_eq!(p.format("%s%F"), "6.500000");
        assert_eq!(p.format("%s%f"), "6.500");
        assert_eq!(p.format("%s.%V"), "6.500");
        assert_eq!(Period::parse(&p.format("%s%F"), "%s%F").unwrap(), p);

        let p = period([0, 0, 0, 0, 0, -5, -1_500_000]);
        assert_eq!(p.format("%r%s%F"), "-6.500000");
        assert_eq!(Period::parse(&p.format("%r%s%F"), "%r%s%F").unwrap(), p);
    }

    #[test]
    fn signed_period_format() {
        let p = period([0, 0, 0, 1, -1, 0, 0]);
        assert_eq!(p.format("%R%D %H"), "+00 23");
        let p = period([0, 0, 0, -1, -30, 0, 0]);
        assert_eq!(p.format("%r%h:%I"), "-1:30");
        assert_eq!(p.format("%R%H:%I"), "-01:30");
    }

    #[test]
    fn period_parse() {
        let p = Period::parse("-1:30:05.25", "%r%h:%I:%S%f").unwrap();
        assert!(p.is_identical(&period([0, 0, 0, -1, -30, -5, -250_000])));

        let p = Period::parse("2w 3d", "%ww %ed").unwrap();
        assert!(p.is_identical(&period([0, 0, 17, 0, 0, 0, 0])));

        let p = Period::parse("+007ms 8us", "%R%Vms %uus").unwrap();
        assert!(p.is_identical(&period([0, 0, 0, 0, 0, 0, 7_008])));

        let p = Period::parse("4 years", "%y years").unwrap();
        assert_eq!(p.years(), 4);

        let p = Period::parse("12", "%S%F").unwrap();
        assert_eq!(p.seconds(), 12);
    }

    #[test]
    fn period_round_trip() {
        let pattern = "%R%yY%mM%dDT%hH%iM%s%FS";
        for fields in [
            [1, 2, 3, 4, 5, 6, 7],
            [0, 0, 0, 0, 0, 0, 0],
            [-1, -2, -3, -4, -5, -6, -7],
            [0, 11, 29, 23, 59, 59, 999_999],
        ] {
            let p = period(fields);
            let text = p.format(pattern);
            let parsed = Period::parse(&text, pattern).unwrap();
            assert!(parsed.is_identical(&p), "{text} did not round trip");
        }
    }

    #[test]
    fn parse_errors() {
        let err = Period::parse("1x", "%dx%").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);

        let err = Period::parse("1", "%q").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);

        let err = Period::parse("+", "%R").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);

        let err = Period::parse("5 days!", "%d days").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);
        assert_eq!(
            err.context(),
            Some(&ErrorContext::Parse {
                source: "5 days!".into(),
                pattern: "%d days".into(),
            })
        );

        let err = Period::parse("", "%d").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);

        let err = Period::parse("5", "%D").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);

        let err = Period::parse("99999999999999999999", "%s").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Overflow);
    }

    #[test]
    fn conflicting_sigils() {
        for pattern in ["%y %Y", "%d %w", "%e %D", "%f %v", "%R%r%d"] {
            let err = Period::parse("1 1", pattern).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Usage, "{pattern}");
        }
    }

    #[test]
    fn regex_metacharacters_are_literal() {
        let p = Period::parse("(3).*", "(%d).*").unwrap();
        assert_eq!(p.days(), 3);
        assert!(Period::parse("(3)xx", "(%d).*").is_err());
    }

    #[test]
    fn offset_patterns() {
        let offset = Offset::from_seconds(-(5 * 3600 + 30 * 60 + 15)).unwrap();
        assert_eq!(offset.format("%R%H%I%S"), "-053015");
        assert_eq!(offset.format("%r%h:%I"), "-5:30");
        assert_eq!(Offset::UTC.format("%R%H:%I"), "+00:00");

        let parsed = Offset::parse("UTC-05:30:15", "UTC%R%H:%I:%S").unwrap();
        assert_eq!(parsed, offset);

        let parsed = Offset::parse("9", "%h").unwrap();
        assert_eq!(parsed.total_seconds(), 9 * 3600);

        let err = Offset::parse("+16:00", "%R%H:%I").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);

        let err = Offset::parse("+01", "%R%H%y").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);
    }
}
