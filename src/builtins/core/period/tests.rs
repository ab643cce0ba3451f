use core::str::FromStr;
use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use crate::{
    error::{ArithmeticOp, ErrorContext, ErrorKind},
    Sign,
};

use super::{Period, PeriodUnit, PeriodUnits};

fn period(fields: [i64; 7]) -> Period {
    Period::from_fields(fields)
}

fn hms(hours: i64, minutes: i64, seconds: i64) -> Period {
    period([0, 0, 0, hours, minutes, seconds, 0])
}

fn hash_of(period: &Period) -> u64 {
    let mut hasher = DefaultHasher::new();
    period.hash(&mut hasher);
    hasher.finish()
}

#[test]
fn construction_folds_weeks_and_milliseconds() {
    let result = Period::new(1, 2, 3, 4, 5, 6, 7, 8, 9).unwrap();
    assert_eq!(result.fields(), [1, 2, 25, 5, 6, 7, 8_009]);

    let units = PeriodUnits {
        weeks: -1,
        days: 2,
        milliseconds: 3,
        ..Default::default()
    };
    let result = Period::from_units(units).unwrap();
    assert_eq!(result.days(), -5);
    assert_eq!(result.microseconds(), 3_000);
    assert_eq!(result.get(PeriodUnit::Day), result.days());
}

#[test]
fn construction_overflow_names_operands() {
    let err = Period::new(0, 0, i64::MAX, 0, 0, 0, 0, 0, 0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Overflow);
    assert_eq!(
        err.context(),
        Some(&ErrorContext::Arithmetic {
            op: ArithmeticOp::Mul,
            lhs: i128::from(i64::MAX),
            rhs: 7,
        })
    );

    let err = Period::new(0, 0, 0, 0, 0, 0, 0, 1, i64::MAX).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Overflow);
}

#[test]
fn plus_and_minus_are_field_wise() {
    let one_hour = Period::of(PeriodUnit::Hour, 1);
    let ninety_minutes = Period::of(PeriodUnit::Minute, 90);

    let result = one_hour.minus(ninety_minutes).unwrap();
    assert!(result.is_identical(&hms(1, -90, 0)));

    let result = one_hour.plus(&ninety_minutes).unwrap();
    assert!(result.is_identical(&hms(1, 90, 0)));

    let units = PeriodUnits {
        weeks: 1,
        milliseconds: 2,
        ..Default::default()
    };
    let result = one_hour.plus(units).unwrap();
    assert!(result.is_identical(&period([0, 0, 7, 1, 0, 0, 2_000])));

    let result = one_hour.minus(units).unwrap();
    assert!(result.is_identical(&period([0, 0, -7, 1, 0, 0, -2_000])));

    let err = period([i64::MAX, 0, 0, 0, 0, 0, 0])
        .plus(Period::of(PeriodUnit::Year, 1))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Overflow);
}

#[test]
fn carry_example() {
    let result = Period::of(PeriodUnit::Second, 3_600).normalized().unwrap();
    assert!(result.is_identical(&hms(1, 0, 0)));
    assert_eq!(result.to_string(), "PT1H");

    let result = period([0, 0, 0, 0, 0, 0, 90_061_000_001]).normalized().unwrap();
    assert!(result.is_identical(&period([0, 0, 1, 1, 1, 1, 1])));
}

#[test]
fn mixed_sign_examples() {
    let result = hms(1, -90, 0).normalized().unwrap();
    assert!(result.is_identical(&hms(0, -30, 0)));
    assert_eq!(result.to_string(), "-PT30M");

    let result = hms(1, -90, 3_660).normalized().unwrap();
    assert!(result.is_identical(&hms(0, 31, 0)));
    assert_eq!(result.to_string(), "PT31M");

    let result = period([0, 0, 48, -8, 0, 0, 0]).normalized().unwrap();
    assert!(result.is_identical(&period([0, 1, 17, 16, 0, 0, 0])));
    assert_eq!(result.to_string(), "P1M17DT16H");

    let result = period([1, 0, 0, 0, 0, 0, -1]).normalized().unwrap();
    assert!(result.is_identical(&period([0, 11, 29, 23, 59, 59, 999_999])));
}

#[test]
fn normalization_is_idempotent_and_sign_preserving() {
    let values = [-61, -30, -1, 0, 1, 29, 59, 61];
    for days in [-31, -1, 0, 1, 31] {
        for hours in [-25, -1, 0, 1, 25] {
            for minutes in values {
                for seconds in values {
                    for micros in [-1_000_001, -1, 0, 1, 999_999] {
                        let input = period([0, 1, days, hours, minutes, seconds, micros]);
                        let normalized = input.normalized().unwrap();

                        assert_eq!(normalized, input, "{input:?}");
                        assert_eq!(normalized.sign(), input.sign(), "{input:?}");
                        assert!(normalized.is_normalized(), "{input:?} -> {normalized:?}");
                        assert!(!normalized.is_mixed_sign(), "{input:?}");

                        let again = normalized.normalized().unwrap();
                        assert!(again.is_identical(&normalized), "{input:?}");
                    }
                }
            }
        }
    }
}

#[test]
fn sign_and_zero() {
    assert_eq!(Period::default().sign(), Sign::Zero);
    assert!(Period::default().is_zero());
    assert!(hms(1, -59, 0).is_positive());
    assert!(hms(1, -61, 0).is_negative());
    assert!(hms(1, -60, 0).is_zero());
    assert!(hms(1, -60, 0).is_mixed_sign());
    assert!(!hms(1, 0, 60).is_mixed_sign());
}

#[test]
fn semantic_equality() {
    assert_eq!(hms(0, 60, 0), hms(1, 0, 0));
    assert_eq!(Period::of(PeriodUnit::Month, 1), Period::of(PeriodUnit::Day, 30));
    assert_eq!(Period::of(PeriodUnit::Year, 1), Period::of(PeriodUnit::Month, 12));
    assert!(!hms(0, 60, 0).is_identical(&hms(1, 0, 0)));
    assert_eq!(hash_of(&hms(0, 60, 0)), hash_of(&hms(1, 0, 0)));
    assert_eq!(hms(1, -90, 0), hms(0, -30, 0));
}

#[test]
fn ordering() {
    assert!(Period::of(PeriodUnit::Year, 1) > Period::of(PeriodUnit::Day, 359));
    assert!(Period::of(PeriodUnit::Day, 1) < hms(24, 0, 1));
    assert!(hms(-1, 0, 0) < Period::default());

    let mut periods = vec![hms(2, 0, 0), hms(0, 0, 1), hms(0, -5, 0), hms(0, 90, 0)];
    periods.sort();
    assert_eq!(
        periods,
        vec![hms(0, -5, 0), hms(0, 0, 1), hms(0, 90, 0), hms(2, 0, 0)]
    );
}

#[test]
fn negation_and_abs() {
    let input = hms(1, -90, 0);
    assert!(input.negated().unwrap().is_identical(&hms(-1, 90, 0)));
    assert!(input.abs().unwrap().is_identical(&hms(-1, 90, 0)));

    let positive = hms(1, -30, 0);
    assert!(positive.abs().unwrap().is_identical(&positive));

    let err = period([i64::MIN, 0, 0, 0, 0, 0, 0]).negated().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Overflow);
}

#[test]
fn multiply_then_divide_round_trips() {
    let inputs = [
        period([1, 2, 3, 4, 5, 6, 7]),
        hms(1, -90, 0),
        period([0, 0, -45, 0, 0, 0, 999_999]),
    ];
    for input in inputs {
        for factor in [1, 2, 3, 7, -1, -5, 1_000] {
            let product = input.multiplied_by(factor).unwrap();
            let quotient = product.divided_by(factor).unwrap();
            assert!(quotient.is_identical(&input), "{input:?} * {factor}");
            assert_eq!(quotient, input);
        }
    }

    let err = Period::of(PeriodUnit::Day, i64::MAX).multiplied_by(2).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Overflow);
    assert_eq!(
        hms(1, 0, 0).divided_by(0).unwrap_err().kind(),
        ErrorKind::DivisionByZero
    );
}

#[test]
fn divide_then_multiply_drifts_less_than_the_divisor() {
    let result = Period::of(PeriodUnit::Day, 1)
        .divided_by(3)
        .unwrap()
        .multiplied_by(3)
        .unwrap();
    assert!(result.is_identical(&hms(24, 0, 0)));
    assert_eq!(result, Period::of(PeriodUnit::Day, 1));

    let result = Period::of(PeriodUnit::Second, 1)
        .divided_by(3)
        .unwrap()
        .multiplied_by(3)
        .unwrap();
    assert!(result.is_identical(&period([0, 0, 0, 0, 0, 0, 999_999])));

    let result = Period::of(PeriodUnit::Year, 1)
        .divided_by(-7)
        .unwrap()
        .multiplied_by(-7)
        .unwrap();
    assert!(result.is_identical(&period([0, 7, 147, 70, 119, 56, 3_999_996])));

    let inputs = [
        Period::of(PeriodUnit::Second, -1),
        period([1, 2, 3, 4, 5, 6, 7]),
        hms(1, -90, 0),
        period([0, 0, -45, 0, 0, 0, 999_999]),
    ];
    for input in inputs {
        for divisor in [2, 3, 7, -1, -7, 1_000] {
            let result = input
                .divided_by(divisor)
                .unwrap()
                .multiplied_by(divisor)
                .unwrap();
            let drift = input.nominal_microseconds() - result.nominal_microseconds();
            assert!(
                (0..i128::from(divisor).abs()).contains(&drift),
                "{input:?} / {divisor} * {divisor} drifted by {drift}"
            );
        }
    }
}

#[test]
fn overflowing_normalization_renders_field_magnitudes() {
    let input = period([i64::MAX, 12, 0, 0, 0, 0, -1]);
    assert!(input.normalized().is_err());
    assert_eq!(input.to_string(), "P9223372036854775807Y12MT0.000001S");
}

#[test]
fn default_period_string() {
    assert_eq!(Period::default().to_string(), "PT0S");
    assert_eq!(Period::of(PeriodUnit::Second, 3_600).to_string(), "PT3600S");
    assert_eq!(period([0, 0, 0, 0, 0, -1, -500_000]).to_string(), "-PT1.5S");
    assert_eq!(period([0, 0, 0, 0, 0, 1, 2_500_000]).to_string(), "PT3.5S");
    assert_eq!(period([1, 2, 3, 0, 0, 0, 0]).to_string(), "P1Y2M3D");
    assert_eq!(period([0, 0, 0, 0, 0, 0, 20]).to_string(), "PT0.00002S");
    assert_eq!(period([0, 0, 1, 2, 0, 0, 0]).to_ixdtf_string(), "P1DT2H");
}

#[test]
fn from_str() {
    let result = Period::from_str("P1Y2M3W4DT5H6M7.123456S").unwrap();
    assert!(result.is_identical(&period([1, 2, 25, 5, 6, 7, 123_456])));

    let result = Period::from_str("-P1D").unwrap();
    assert!(result.is_identical(&Period::of(PeriodUnit::Day, -1)));

    let result = Period::from_str("PT1.5H").unwrap();
    assert!(result.is_identical(&hms(1, 30, 0)));

    let result = Period::from_str("PT0.25M").unwrap();
    assert!(result.is_identical(&hms(0, 0, 15)));

    let result = Period::from_str("PT0.5S").unwrap();
    assert_eq!(result.microseconds(), 500_000);
}

#[test]
fn from_str_errors() {
    let err = Period::from_str("PT1.0000001S").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Range);

    for source in ["P", "1D", "PT", "P1H", ""] {
        let err = Period::from_str(source).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax, "{source}");
    }
}

#[test]
fn string_round_trip() {
    let inputs = [
        period([1, 2, 3, 4, 5, 6, 7]),
        period([0, 0, 0, 0, 0, 0, 0]),
        period([-1, -2, -3, -4, -5, -6, -7]),
        period([0, 0, 48, -8, 0, 0, 0]),
        hms(1, -90, 3_660),
        period([0, 0, 0, 0, 0, 59, 999_999]),
    ];
    for input in inputs {
        let text = input.to_string();
        let parsed = Period::from_str(&text).unwrap();
        assert_eq!(parsed, input, "{text}");
    }
}
