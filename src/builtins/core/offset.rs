//! This module implements `Offset`, a UTC offset in whole seconds, and the
//! `OffsetTable` that interns shared `Offset` handles.

use crate::{
    parsers::{
        self,
        pattern::{self, FormattablePattern},
        FormattableOffset,
    },
    primitive::{checked_add, checked_mul, checked_sub},
    validate, Sign, TempoError, TempoResult,
};
use core::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};
use rustc_hash::FxHashMap;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};
use writeable::Writeable;

/// The origin of an `Offset`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OffsetKind {
    /// An offset that is not tied to a zone's rules.
    #[default]
    Fixed,
    /// A zone's standard time offset.
    Standard,
    /// A zone's daylight saving time offset.
    Daylight,
}

/// A signed offset from UTC with second precision, bounded to ±15:59:59.
///
/// Equality, ordering and hashing only consider the total seconds; use
/// [`Offset::is_identical`] to also compare the `OffsetKind`.
#[non_exhaustive]
#[derive(Debug, Default, Clone, Copy)]
pub struct Offset {
    seconds: i32,
    kind: OffsetKind,
}

impl Offset {
    /// The zero offset.
    pub const UTC: Self = Self::new_unchecked(0, OffsetKind::Fixed);

    #[inline]
    pub(crate) const fn new_unchecked(seconds: i32, kind: OffsetKind) -> Self {
        Self { seconds, kind }
    }

    /// Creates a fixed `Offset` from its total seconds.
    pub fn from_seconds(seconds: i64) -> TempoResult<Self> {
        validate::check_offset_seconds(seconds)?;
        // NOTE: the range check keeps `seconds` within `i32`.
        Ok(Self::new_unchecked(seconds as i32, OffsetKind::Fixed))
    }

    /// Creates a fixed `Offset` from a sign and unsigned components.
    pub fn from_components(sign: Sign, hours: u8, minutes: u8, seconds: u8) -> TempoResult<Self> {
        validate::check_offset_components(hours.into(), minutes.into(), seconds.into())?;
        let total = i64::from(hours) * 3600 + i64::from(minutes) * 60 + i64::from(seconds);
        Self::from_seconds(total * i64::from(sign.as_sign_multiplier()))
    }

    /// Returns this offset tagged with `kind`.
    #[inline]
    #[must_use]
    pub const fn with_kind(self, kind: OffsetKind) -> Self {
        Self::new_unchecked(self.seconds, kind)
    }

    /// Returns the shared handle for this offset from the process-wide table.
    #[must_use]
    pub fn interned(self) -> Arc<Self> {
        OffsetTable::global().intern(self)
    }
}

// ==== Getters ====

impl Offset {
    /// Returns the signed total seconds.
    #[inline]
    #[must_use]
    pub const fn total_seconds(&self) -> i32 {
        self.seconds
    }

    #[inline]
    #[must_use]
    pub const fn kind(&self) -> OffsetKind {
        self.kind
    }

    #[inline]
    #[must_use]
    pub fn sign(&self) -> Sign {
        Sign::from(self.seconds.cmp(&0))
    }

    /// Returns the hours component of the offset's magnitude.
    #[inline]
    #[must_use]
    pub const fn hour(&self) -> u8 {
        (self.seconds.unsigned_abs() / 3600) as u8
    }

    /// Returns the minutes component of the offset's magnitude.
    #[inline]
    #[must_use]
    pub const fn minute(&self) -> u8 {
        (self.seconds.unsigned_abs() / 60 % 60) as u8
    }

    /// Returns the seconds component of the offset's magnitude.
    #[inline]
    #[must_use]
    pub const fn second(&self) -> u8 {
        (self.seconds.unsigned_abs() % 60) as u8
    }

    /// Returns whether both offsets have the same seconds and kind.
    #[inline]
    #[must_use]
    pub fn is_identical(&self, other: &Self) -> bool {
        self.seconds == other.seconds && self.kind == other.kind
    }
}

// ==== Arithmetic ====
//
// Results keep the receiver's `OffsetKind`.

impl Offset {
    fn with_seconds(&self, seconds: i64) -> TempoResult<Self> {
        Ok(Self::from_seconds(seconds)?.with_kind(self.kind))
    }

    /// Returns this offset moved by `seconds`.
    pub fn plus_seconds(&self, seconds: i64) -> TempoResult<Self> {
        self.with_seconds(checked_add(i64::from(self.seconds), seconds)?)
    }

    /// Returns this offset moved back by `seconds`.
    pub fn minus_seconds(&self, seconds: i64) -> TempoResult<Self> {
        self.with_seconds(checked_sub(i64::from(self.seconds), seconds)?)
    }

    pub fn plus(&self, other: &Self) -> TempoResult<Self> {
        self.plus_seconds(other.seconds.into())
    }

    pub fn minus(&self, other: &Self) -> TempoResult<Self> {
        self.minus_seconds(other.seconds.into())
    }

    pub fn multiplied_by(&self, factor: i64) -> TempoResult<Self> {
        self.with_seconds(checked_mul(i64::from(self.seconds), factor)?)
    }

    /// Divides the total seconds by `divisor`, truncating toward zero.
    pub fn divided_by(&self, divisor: i64) -> TempoResult<Self> {
        if divisor == 0 {
            return Err(TempoError::division_by_zero());
        }
        self.with_seconds(i64::from(self.seconds) / divisor)
    }

    #[must_use]
    pub const fn negated(&self) -> Self {
        Self::new_unchecked(-self.seconds, self.kind)
    }

    #[must_use]
    pub const fn abs(&self) -> Self {
        Self::new_unchecked(self.seconds.abs(), self.kind)
    }
}

impl PartialEq for Offset {
    fn eq(&self, other: &Self) -> bool {
        self.seconds == other.seconds
    }
}

impl Eq for Offset {}

impl PartialOrd for Offset {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Offset {
    fn cmp(&self, other: &Self) -> Ordering {
        self.seconds.cmp(&other.seconds)
    }
}

impl Hash for Offset {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.seconds.hash(state);
    }
}

// ==== Text ====

impl Offset {
    /// Renders this offset with a `%`-sigil pattern.
    ///
    /// ```rust
    /// use tempo_rs::Offset;
    ///
    /// let offset = Offset::from_seconds(-(5 * 3600 + 30 * 60)).unwrap();
    /// assert_eq!(offset.format("UTC%R%H%I"), "UTC-0530");
    /// ```
    #[must_use]
    pub fn format(&self, pattern: &str) -> String {
        FormattablePattern::new(self, pattern)
            .write_to_string()
            .into_owned()
    }

    /// Parses `source` with a `%`-sigil pattern into a fixed offset.
    pub fn parse(source: &str, pattern: &str) -> TempoResult<Self> {
        pattern::parse(source, pattern)
    }

    fn to_formattable(self) -> FormattableOffset {
        FormattableOffset {
            sign: self.sign(),
            hour: self.hour(),
            minute: self.minute(),
            second: self.second(),
        }
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_formattable().write_to(f)
    }
}

impl FromStr for Offset {
    type Err = TempoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_seconds(parsers::parse_offset_seconds(s)?)
    }
}

// ==== OffsetTable ====

type OffsetKey = (OffsetKind, i32);

/// An interning table handing out one shared `Arc<Offset>` per distinct
/// seconds and kind.
///
/// Interning only shares storage: two offsets compare by value regardless
/// of where they came from.
#[derive(Debug, Default)]
pub struct OffsetTable {
    entries: RwLock<FxHashMap<OffsetKey, Arc<Offset>>>,
}

static GLOBAL_TABLE: LazyLock<OffsetTable> = LazyLock::new(OffsetTable::new);

impl OffsetTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide table.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL_TABLE
    }

    /// Returns the shared handle for `offset`, inserting it when absent.
    pub fn intern(&self, offset: Offset) -> Arc<Offset> {
        let key = (offset.kind, offset.seconds);
        {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(entry) = entries.get(&key) {
                return Arc::clone(entry);
            }
        }

        // The map is only changed by a single insert, so a poisoned lock
        // still holds a consistent map.
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let entry = entries.entry(key).or_insert_with(|| {
            #[cfg(feature = "log")]
            log::debug!("interning offset {offset} ({:?})", offset.kind);
            Arc::new(offset)
        });
        Arc::clone(entry)
    }

    /// Returns the number of interned offsets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
