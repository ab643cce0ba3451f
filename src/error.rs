//! This module implements `TempoError`.

use core::fmt;
use std::borrow::Cow;

/// `TempoError`'s error type.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An integer result could not be represented.
    Overflow,
    /// A value fell outside its declared bounds.
    #[default]
    Range,
    /// A period or offset was divided by zero.
    DivisionByZero,
    /// Text did not conform to the expected pattern.
    Syntax,
    /// Conflicting arguments were supplied to the same call.
    Usage,
    /// An internal invariant was violated.
    Assert,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overflow => "OverflowError",
            Self::Range => "RangeError",
            Self::DivisionByZero => "DivisionByZeroError",
            Self::Syntax => "SyntaxError",
            Self::Usage => "UsageError",
            Self::Assert => "ImplementationError",
        }
        .fmt(f)
    }
}

/// The integer operation that overflowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Neg,
}

impl fmt::Display for ArithmeticOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Neg => "neg",
        }
        .fmt(f)
    }
}

/// The offending values attached to a `TempoError`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorContext {
    /// The operands of an overflowing operation. `rhs` is zero for unary operations.
    Arithmetic {
        op: ArithmeticOp,
        lhs: i128,
        rhs: i128,
    },
    /// A field value outside of `min..=max`.
    Field {
        field: &'static str,
        min: i64,
        max: i64,
        value: i64,
    },
    /// The text and pattern of a failed parse.
    Parse { source: String, pattern: String },
}

/// The error type for `tempo_rs`.
#[derive(Debug, Clone, PartialEq)]
pub struct TempoError {
    kind: ErrorKind,
    msg: Cow<'static, str>,
    context: Option<ErrorContext>,
}

impl TempoError {
    fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            msg: Cow::Borrowed(""),
            context: None,
        }
    }

    /// Create an overflow error.
    #[must_use]
    pub fn overflow() -> Self {
        Self::new(ErrorKind::Overflow)
    }

    /// Create a range error.
    #[must_use]
    pub fn range() -> Self {
        Self::new(ErrorKind::Range)
    }

    /// Create a division by zero error.
    #[must_use]
    pub fn division_by_zero() -> Self {
        Self::new(ErrorKind::DivisionByZero).with_message("division by zero")
    }

    /// Create a syntax error.
    #[must_use]
    pub fn syntax() -> Self {
        Self::new(ErrorKind::Syntax)
    }

    /// Create a usage error.
    #[must_use]
    pub fn usage() -> Self {
        Self::new(ErrorKind::Usage)
    }

    /// Creates an assertion error
    #[must_use]
    pub(crate) fn assert() -> Self {
        Self::new(ErrorKind::Assert)
            .with_message("Implementation error: assertion failed.")
    }

    /// Create an overflow error for `lhs op rhs`.
    #[must_use]
    pub(crate) fn arithmetic(op: ArithmeticOp, lhs: i128, rhs: i128) -> Self {
        let msg = match op {
            ArithmeticOp::Neg => format!("negating {lhs} overflowed"),
            _ => format!("{lhs} {op} {rhs} overflowed"),
        };
        Self::overflow()
            .with_message(msg)
            .with_context(ErrorContext::Arithmetic { op, lhs, rhs })
    }

    /// Create a range error for a field outside of `min..=max`.
    #[must_use]
    pub(crate) fn field(field: &'static str, min: i64, max: i64, value: i64) -> Self {
        Self::range()
            .with_message(format!("{field} must be within {min}..={max}, got {value}"))
            .with_context(ErrorContext::Field {
                field,
                min,
                max,
                value,
            })
    }

    /// Create a syntax error for `source` not matching `pattern`.
    #[must_use]
    pub(crate) fn parse_mismatch(source: &str, pattern: &str) -> Self {
        Self::syntax()
            .with_message(format!("\"{source}\" does not match the pattern \"{pattern}\""))
            .with_context(ErrorContext::Parse {
                source: source.into(),
                pattern: pattern.into(),
            })
    }

    /// Add a message to the error.
    #[must_use]
    pub fn with_message<S>(mut self, msg: S) -> Self
    where
        S: Into<Cow<'static, str>>,
    {
        self.msg = msg.into();
        self
    }

    /// Attach the offending values to the error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Returns this error's kind.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error message.
    #[inline]
    #[must_use]
    pub fn message(&self) -> &str {
        &self.msg
    }

    /// Returns the offending values, if any were recorded.
    #[inline]
    #[must_use]
    pub fn context(&self) -> Option<&ErrorContext> {
        self.context.as_ref()
    }
}

impl fmt::Display for TempoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        let msg = self.msg.trim();
        if !msg.is_empty() {
            write!(f, ": {msg}")?;
        }

        Ok(())
    }
}

impl std::error::Error for TempoError {}
