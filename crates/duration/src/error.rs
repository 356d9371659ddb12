use crate::unit::TimeUnit;
use thiserror::Error;

/// Everything that can go wrong while compiling a format or parsing a duration against it.
///
/// All variants are terminal for the parse that raised them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DurationError {
    #[error("Unknown duration unit '{0}', expected one of D, H, M, S")]
    InvalidDurationUnit(String),

    #[error("Field width '{0}' is not an integer")]
    InvalidParseLength(String),

    #[error("Duration segment '{segment}' does not conform to format chunk '{chunk}'")]
    FormatMismatch { segment: String, chunk: String },

    #[error("A value for unit '{0}' has already been assigned")]
    DoubleValueAssignment(TimeUnit),

    #[error("Value '{segment}' for unit '{unit}' is too large")]
    MagnitudeOverflow { unit: TimeUnit, segment: String },
}
