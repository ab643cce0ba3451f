//! This module implements the normalization of a `Period`.
//!
//! Normalization alternates two passes until the fields settle:
//!
//!   - carry: each field's whole multiples of its factor move into the next
//!     larger field, truncating toward zero.
//!   - reconcile: a field whose sign disagrees with the most significant
//!     nonzero field borrows one unit from the nearest larger nonzero field.
//!
//! The nominal length of the period is preserved by both passes.

use super::{Period, PeriodUnit};
use crate::{primitive::checked_add, tempo_assert, TempoResult, TempoUnwrap};

/// The working record of a `Period` being normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NormalizedPeriod {
    fields: [i64; 7],
}

impl NormalizedPeriod {
    pub(crate) const fn new(period: &Period) -> Self {
        Self {
            fields: period.fields,
        }
    }

    /// Moves whole multiples of each field's factor into the next larger
    /// field, smallest first.
    ///
    /// Returns whether any field changed.
    pub(crate) fn carry(&mut self) -> TempoResult<bool> {
        let mut changed = false;
        for index in (1..self.fields.len()).rev() {
            let factor = PeriodUnit::ALL[index].factor().tempo_unwrap()?;
            let overflow = self.fields[index] / factor;
            if overflow == 0 {
                continue;
            }
            // NOTE: `overflow * factor` never exceeds the field's magnitude.
            self.fields[index] -= overflow * factor;
            self.fields[index - 1] = checked_add(self.fields[index - 1], overflow)?;
            changed = true;
        }
        Ok(changed)
    }

    /// Aligns every field with the sign of the most significant nonzero
    /// field by borrowing from the nearest larger nonzero field.
    ///
    /// Zero fields between the lender and the borrower widen the amount
    /// borrowed. Returns whether any field changed.
    pub(crate) fn reconcile(&mut self) -> bool {
        let mut changed = false;
        let mut dominant = 0;
        let mut lender: Option<usize> = None;
        let mut scope: i64 = 1;

        for (index, unit) in PeriodUnit::ALL.iter().enumerate() {
            if let Some(factor) = unit.factor() {
                scope *= factor;
            }
            let value = self.fields[index];
            if value == 0 {
                continue;
            }
            match lender {
                None => dominant = value.signum(),
                Some(previous) if value.signum() != dominant => {
                    // NOTE: both adjustments move a field toward or across
                    // zero by at most `scope`, which cannot overflow.
                    self.fields[previous] -= dominant;
                    self.fields[index] += dominant * scope;
                    changed = true;
                }
                Some(_) => {}
            }
            lender = Some(index);
            scope = 1;
        }
        changed
    }

    /// Returns whether any two nonzero fields have opposite signs.
    pub(crate) fn is_mixed_sign(&self) -> bool {
        Period::from_fields(self.fields).is_mixed_sign()
    }

    pub(crate) const fn into_period(self) -> Period {
        Period::from_fields(self.fields)
    }
}

impl Period {
    /// Returns the canonical form of this period.
    ///
    /// Every field of the result shares the sign of the period, and every
    /// field except `years` is below its factor in magnitude. Months are a
    /// nominal 30 days and years a nominal 12 months.
    ///
    /// ```rust
    /// use tempo_rs::{Period, PeriodUnit};
    ///
    /// let period = Period::of(PeriodUnit::Second, 3_600);
    /// assert_eq!(period.normalized().unwrap().to_string(), "PT1H");
    /// ```
    pub fn normalized(&self) -> TempoResult<Self> {
        let mut record = NormalizedPeriod::new(self);

        let mut changed = record.carry()?;
        while record.reconcile() {
            changed = true;
            record.carry()?;
        }

        tempo_assert!(
            !record.is_mixed_sign(),
            "normalized period has mixed signs: {:?}",
            record
        );

        if !changed {
            return Ok(*self);
        }
        Ok(record.into_period())
    }

    /// Returns whether this period is already in its canonical form.
    #[must_use]
    pub fn is_normalized(&self) -> bool {
        !self.is_mixed_sign()
            && PeriodUnit::ALL.iter().skip(1).all(|unit| {
                unit.factor().is_some_and(|factor| {
                    self.get(*unit).unsigned_abs() < factor.unsigned_abs()
                })
            })
    }
}
