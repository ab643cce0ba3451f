//! Division of a `Period` by an integer.

use super::{Period, PeriodUnit};
use crate::{primitive::narrow, TempoError, TempoResult};

impl Period {
    /// Divides this period by `divisor`.
    ///
    /// The division runs from the largest field to the smallest, carrying
    /// each field's remainder into the next smaller field at its nominal
    /// factor. Quotients are floored and the final microsecond remainder is
    /// dropped. A negative divisor negates every resulting field.
    ///
    /// ```rust
    /// use tempo_rs::Period;
    /// use core::str::FromStr;
    ///
    /// let period = Period::from_str("P1D").unwrap();
    /// assert_eq!(period.divided_by(4).unwrap().to_string(), "PT6H");
    /// ```
    pub fn divided_by(&self, divisor: i64) -> TempoResult<Self> {
        if divisor == 0 {
            return Err(TempoError::division_by_zero());
        }
        let magnitude = i128::from(divisor).abs();

        let mut fields = [0; 7];
        let mut remainder: i128 = 0;
        for unit in PeriodUnit::ALL {
            let factor = unit.factor().unwrap_or(1);
            let combined = i128::from(self.get(unit)) + remainder * i128::from(factor);
            let quotient = combined.div_euclid(magnitude);
            remainder = combined.rem_euclid(magnitude);
            fields[unit.index()] = narrow(if divisor < 0 { -quotient } else { quotient })?;
        }

        Ok(Self::from_fields(fields))
    }
}
