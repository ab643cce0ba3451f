//! Utility date equations for the proleptic Gregorian calendar.

/// Days in a 400 year Gregorian era.
const DAYS_PER_ERA: i64 = 146_097;

/// Days between 0000-03-01 and 1970-01-01.
const EPOCH_SHIFT: i64 = 719_468;

/// Returns whether `year` is a leap year.
#[inline]
pub(crate) const fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// `ISODaysInMonth ( year, month )`
pub(crate) fn iso_days_in_month(year: i32, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => unreachable!("ISODaysInMonth panicking is an implementation error."),
    }
}

/// Balances a year and an unbounded month into a year and a month in `1..=12`.
#[inline]
pub(crate) fn balance_iso_year_month(year: i64, month: i64) -> (i128, u8) {
    let month = i128::from(month) - 1;
    let y = i128::from(year) + month.div_euclid(12);
    let m = month.rem_euclid(12) + 1;
    // NOTE: rem_euclid keeps `m` within 1..=12.
    (y, m as u8)
}

/// Returns the days since 1970-01-01 for the given date.
///
/// `month` must be in `1..=12`; `day` is not bounded, so days beyond the end
/// of the month continue into the following months.
pub(crate) fn iso_date_to_epoch_days(year: i64, month: u8, day: i64) -> i64 {
    let month = i64::from(month);
    let year = if month <= 2 { year - 1 } else { year };
    let era = year.div_euclid(400);
    let year_of_era = year - era * 400;
    let shifted_month = if month > 2 { month - 3 } else { month + 9 };
    let day_of_year = (153 * shifted_month + 2) / 5 + day - 1;
    let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
    era * DAYS_PER_ERA + day_of_era - EPOCH_SHIFT
}

/// Returns the `(year, month, day)` for the given days since 1970-01-01.
pub(crate) fn epoch_days_to_iso_date(epoch_days: i64) -> (i64, u8, u8) {
    let shifted = epoch_days + EPOCH_SHIFT;
    let era = shifted.div_euclid(DAYS_PER_ERA);
    let day_of_era = shifted - era * DAYS_PER_ERA;
    let year_of_era =
        (day_of_era - day_of_era / 1460 + day_of_era / 36_524 - day_of_era / 146_096) / 365;
    let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
    let shifted_month = (5 * day_of_year + 2) / 153;
    let day = day_of_year - (153 * shifted_month + 2) / 5 + 1;
    let month = if shifted_month < 10 {
        shifted_month + 3
    } else {
        shifted_month - 9
    };
    let year = year_of_era + era * 400 + i64::from(month <= 2);
    // NOTE: month is within 1..=12 and day within 1..=31 by construction.
    (year, month as u8, day as u8)
}
