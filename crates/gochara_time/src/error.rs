//! Error types for instant construction.

use thiserror::Error;

/// Errors raised while building an [`crate::Instant`].
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum TimeError {
    /// Input cannot be resolved to exactly one UTC moment (naive text,
    /// ambiguous or skipped local time, unparseable string).
    #[error("invalid time: {0}")]
    InvalidTime(String),
    /// Julian Day is not finite or lies outside the representable range.
    #[error("julian day {0} is outside the representable range")]
    OutOfRange(f64),
}
