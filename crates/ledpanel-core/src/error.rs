//! Error types for ledpanel-core.
//!
//! Every failure is classified into an [`ErrorKind`] so front-ends can decide
//! how to surface it:
//!
//! | Kind | Variants | Typical handling |
//! |------|----------|------------------|
//! | [`ErrorKind::NetworkFailure`] | [`Error::NotReachable`], [`Error::Status`] | Log, fall back to a default |
//! | [`ErrorKind::MalformedResponse`] | [`Error::Malformed`] | Log, fall back to a default |
//! | [`ErrorKind::UserActionFailure`] | [`Error::ToggleFailed`] | Show a notification |
//! | [`ErrorKind::Configuration`] | [`Error::InvalidUrl`], [`Error::InvalidConfig`] | Fix configuration and restart |
//!
//! Reads never retry. A failed toggle leaves local state untouched.

use ledpanel_types::{LedId, ParseError};
use thiserror::Error;

/// Errors that can occur when talking to the LED service.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The service could not be reached.
    #[error("Service not reachable at {url}: {source}")]
    NotReachable {
        /// Request URL.
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-success status.
    #[error("Request to {url} failed with HTTP {status}: {message}")]
    Status {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error message from the body, or the status text.
        message: String,
    },

    /// The payload did not have the expected shape.
    #[error("Malformed response from {url}: {reason}")]
    Malformed {
        /// Request URL.
        url: String,
        /// What was wrong with the payload.
        reason: String,
    },

    /// The configured base URL is unusable.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A user-requested state change was rejected.
    #[error("No se pudo cambiar el estado del LED. (LED {id}: {source})")]
    ToggleFailed {
        /// The LED whose write failed.
        id: LedId,
        /// Underlying failure.
        #[source]
        source: Box<Error>,
    },
}

/// Broad classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The service was unreachable or answered with a non-2xx status.
    NetworkFailure,
    /// The payload failed the boundary schema check.
    MalformedResponse,
    /// A user-initiated write failed.
    UserActionFailure,
    /// The client was misconfigured.
    Configuration,
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotReachable { .. } | Self::Status { .. } => ErrorKind::NetworkFailure,
            Self::Malformed { .. } => ErrorKind::MalformedResponse,
            Self::ToggleFailed { .. } => ErrorKind::UserActionFailure,
            Self::InvalidUrl(_) | Self::InvalidConfig(_) => ErrorKind::Configuration,
        }
    }

    /// Create a malformed-payload error for a request URL.
    pub fn malformed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Wrap a failed write as a user action failure.
    pub fn toggle_failed(id: LedId, source: Error) -> Self {
        Self::ToggleFailed {
            id,
            source: Box::new(source),
        }
    }

    /// Message suitable for a user-facing notification.
    pub fn user_message(&self) -> String {
        match self {
            Self::ToggleFailed { .. } => TOGGLE_FAILED_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

/// Notification text shown when a toggle fails.
pub const TOGGLE_FAILED_MESSAGE: &str = "No se pudo cambiar el estado del LED.";

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Error::Malformed {
            url: String::new(),
            reason: err.to_string(),
        }
    }
}

/// Result type alias using ledpanel-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::malformed("http://x/historial", "expected an array");
        assert_eq!(
            err.to_string(),
            "Malformed response from http://x/historial: expected an array"
        );

        let err = Error::Status {
            url: "http://x/led/1".to_string(),
            status: 500,
            message: "boom".to_string(),
        };
        assert!(err.to_string().contains("HTTP 500"));

        let err = Error::invalid_config("no LEDs");
        assert_eq!(err.to_string(), "Invalid configuration: no LEDs");
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            Error::malformed("u", "r").kind(),
            ErrorKind::MalformedResponse
        );
        assert_eq!(
            Error::InvalidUrl("x".to_string()).kind(),
            ErrorKind::Configuration
        );
        let status = Error::Status {
            url: "u".to_string(),
            status: 404,
            message: "Not Found".to_string(),
        };
        assert_eq!(status.kind(), ErrorKind::NetworkFailure);
        let toggle = Error::toggle_failed(LedId::new(1).unwrap(), status);
        assert_eq!(toggle.kind(), ErrorKind::UserActionFailure);
        assert_eq!(toggle.user_message(), TOGGLE_FAILED_MESSAGE);
    }

    #[test]
    fn test_parse_error_becomes_malformed() {
        let err: Error = ParseError::UnknownState("PRENDIDO".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
        assert!(err.to_string().contains("PRENDIDO"));
    }
}
