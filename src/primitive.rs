//! Checked integer primitives.
//!
//! Every operation in this module either returns the exact result or a
//! `TempoError` of kind `Overflow` carrying the operands.

use crate::{
    error::{ArithmeticOp, TempoError},
    TempoResult,
};
use num_traits::{CheckedAdd, CheckedMul, CheckedNeg, CheckedSub};

/// Checked `lhs + rhs`.
#[inline]
pub fn checked_add<T>(lhs: T, rhs: T) -> TempoResult<T>
where
    T: CheckedAdd + Copy + Into<i128>,
{
    lhs.checked_add(&rhs)
        .ok_or_else(|| TempoError::arithmetic(ArithmeticOp::Add, lhs.into(), rhs.into()))
}

/// Checked `lhs - rhs`.
#[inline]
pub fn checked_sub<T>(lhs: T, rhs: T) -> TempoResult<T>
where
    T: CheckedSub + Copy + Into<i128>,
{
    lhs.checked_sub(&rhs)
        .ok_or_else(|| TempoError::arithmetic(ArithmeticOp::Sub, lhs.into(), rhs.into()))
}

/// Checked `lhs * rhs`.
#[inline]
pub fn checked_mul<T>(lhs: T, rhs: T) -> TempoResult<T>
where
    T: CheckedMul + Copy + Into<i128>,
{
    lhs.checked_mul(&rhs)
        .ok_or_else(|| TempoError::arithmetic(ArithmeticOp::Mul, lhs.into(), rhs.into()))
}

/// Checked `-value`.
#[inline]
pub fn checked_neg<T>(value: T) -> TempoResult<T>
where
    T: CheckedNeg + Copy + Into<i128>,
{
    value
        .checked_neg()
        .ok_or_else(|| TempoError::arithmetic(ArithmeticOp::Neg, value.into(), 0))
}

/// Checked `value * factor + addend`.
#[inline]
pub fn checked_mul_add<T>(value: T, factor: T, addend: T) -> TempoResult<T>
where
    T: CheckedAdd + CheckedMul + Copy + Into<i128>,
{
    checked_add(checked_mul(value, factor)?, addend)
}

/// Narrows a wide intermediate back into an `i64`.
#[inline]
pub(crate) fn narrow(value: i128) -> TempoResult<i64> {
    i64::try_from(value).map_err(|_| {
        TempoError::overflow().with_message(format!("{value} does not fit in a 64-bit field"))
    })
}
