//! The `tempo_rs` crate implements immutable calendar periods and UTC
//! offsets, along with calendar-aware period arithmetic over a proleptic
//! Gregorian calendar.
//!
//! ```rust
//! use tempo_rs::{iso::IsoDateTime, Period};
//! use core::str::FromStr;
//!
//! // Periods keep whatever fields they were created with.
//! let ninety_minutes = Period::from_str("PT90M").unwrap();
//! let period = Period::from_str("PT1H").unwrap().minus(ninety_minutes).unwrap();
//! assert_eq!(period.hours(), 1);
//! assert_eq!(period.minutes(), -90);
//!
//! // Normalization carries and reconciles signs.
//! assert_eq!(period.normalized().unwrap().to_string(), "-PT30M");
//!
//! // Adding months clamps to the end of the month.
//! let start = IsoDateTime::try_new(2021, 1, 31, 0, 0, 0, 0).unwrap();
//! let end = Period::from_str("P1M").unwrap().add_to(&start).unwrap();
//! assert_eq!((end.date.month, end.date.day), (2, 28));
//! ```
//!
//! Periods are exact: every operation either returns the precise result
//! or a [`TempoError`] describing the overflow, range violation or parse
//! failure.
#![cfg_attr(not(test), forbid(clippy::unwrap_used))]
#![allow(
    // Currently throws a false positive regarding dependencies that are only used in tests.
    unused_crate_dependencies,
    clippy::module_name_repetitions,
    clippy::redundant_pub_crate,
    clippy::too_many_lines,
    clippy::missing_errors_doc,
    clippy::option_if_let_else,

    // Narrowing casts are guarded by the surrounding range checks.
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
)]

pub mod error;
pub mod host;
pub mod iso;
pub mod parsers;
pub mod primitive;
pub mod validate;

mod builtins;

#[doc(hidden)]
pub(crate) mod utils;

use core::cmp::Ordering;

#[doc(inline)]
pub use error::TempoError;

/// The `tempo_rs` result type
pub type TempoResult<T> = Result<T, TempoError>;

pub use crate::builtins::core::{
    calendar::CalendarAdder,
    offset::{Offset, OffsetKind, OffsetTable},
    period::{Magnitude, Period, PeriodUnit, PeriodUnits},
};

/// A library specific trait for unwrapping assertions.
pub(crate) trait TempoUnwrap {
    type Output;

    /// `tempo_rs` based assertion for unwrapping. This will panic in
    /// debug builds, but throws error during runtime.
    fn tempo_unwrap(self) -> TempoResult<Self::Output>;
}

impl<T> TempoUnwrap for Option<T> {
    type Output = T;

    fn tempo_unwrap(self) -> TempoResult<Self::Output> {
        debug_assert!(self.is_some());
        self.ok_or(TempoError::assert())
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! tempo_assert {
    ($condition:expr $(,)*) => {
        if !$condition {
            return Err($crate::TempoError::assert());
        }
    };
    ($condition:expr, $($args:tt)+) => {
        if !$condition {
            #[cfg(feature = "log")]
            log::error!($($args)+);
            return Err($crate::TempoError::assert());
        }
    };
}

/// A general Sign type.
#[repr(i8)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sign {
    #[default]
    Positive = 1,
    Zero = 0,
    Negative = -1,
}

impl From<i8> for Sign {
    fn from(value: i8) -> Self {
        match value.cmp(&0) {
            Ordering::Greater => Self::Positive,
            Ordering::Equal => Self::Zero,
            Ordering::Less => Self::Negative,
        }
    }
}

impl From<Ordering> for Sign {
    fn from(value: Ordering) -> Self {
        match value {
            Ordering::Greater => Self::Positive,
            Ordering::Equal => Self::Zero,
            Ordering::Less => Self::Negative,
        }
    }
}

impl Sign {
    /// Coerces the current `Sign` to be either negative or positive.
    pub(crate) fn as_sign_multiplier(&self) -> i8 {
        if matches!(self, Self::Zero) {
            return 1;
        }
        *self as i8
    }

    /// Returns the opposite `Sign`.
    #[must_use]
    pub fn negate(&self) -> Sign {
        Sign::from(-(*self as i8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_conversions() {
        assert_eq!(Sign::from(7), Sign::Positive);
        assert_eq!(Sign::from(0), Sign::Zero);
        assert_eq!(Sign::from(-3), Sign::Negative);
        assert_eq!(Sign::from(Ordering::Less), Sign::Negative);
        assert_eq!(Sign::Zero.as_sign_multiplier(), 1);
        assert_eq!(Sign::Negative.as_sign_multiplier(), -1);
        assert_eq!(Sign::Negative.negate(), Sign::Positive);
        assert_eq!(Sign::Zero.negate(), Sign::Zero);
    }

    #[test]
    fn unwrap_reports_assertion() {
        assert_eq!(Some(3).tempo_unwrap(), Ok(3));
    }
}
