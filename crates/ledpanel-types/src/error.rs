//! Error types for payload parsing in ledpanel-types.

use thiserror::Error;

/// Errors that can occur when converting raw service data into typed values.
///
/// This error type is transport-agnostic and does not include
/// HTTP errors (those belong in ledpanel-core).
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The data did not have the expected overall shape.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A field was present but its value is out of range.
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// A required field was absent.
    #[error("Missing field '{0}'")]
    MissingField(&'static str),

    /// A state string was neither `ENCENDIDO` nor `APAGADO`.
    #[error("Unknown LED state '{0}'")]
    UnknownState(String),
}

/// Result type alias using ledpanel-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
