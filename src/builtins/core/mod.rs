//! The core value types of `tempo_rs`.

pub mod calendar;
pub mod offset;
pub mod period;

#[doc(inline)]
pub use calendar::CalendarAdder;
#[doc(inline)]
pub use offset::{Offset, OffsetKind, OffsetTable};
#[doc(inline)]
pub use period::{Magnitude, Period, PeriodUnit, PeriodUnits};
