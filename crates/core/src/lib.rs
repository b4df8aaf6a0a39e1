//! Shared primitives for all Rust crates in Fluxgate Studio.

#![forbid(unsafe_code)]

/// Session credential primitives shared across services.
pub mod auth;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use auth::SessionTokens;

/// Result type used across Fluxgate Studio crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Common application error categories.
///
/// The `Display` output of every variant is suitable for a user-facing
/// error banner.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Write operation conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The backend answered 401: the bearer credential is missing or stale.
    #[error("Session expired. Please sign in again.")]
    SessionExpired,

    /// The backend answered with a non-success status other than 401.
    #[error("{message}")]
    Http {
        /// HTTP status code returned by the backend.
        status: u16,
        /// Message parsed from the error body, or `HTTP <status>`.
        message: String,
    },

    /// No usable response was received.
    #[error("transport error: {0}")]
    Transport(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status behind this error, when one is known.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::SessionExpired => Some(401),
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AppError, NonEmptyString};

    #[test]
    fn non_empty_string_rejects_whitespace() {
        let result = NonEmptyString::new("   ");
        assert!(result.is_err());
    }

    #[test]
    fn session_expired_reports_unauthorized_status() {
        let error = AppError::SessionExpired;
        assert_eq!(error.status(), Some(401));
        assert_eq!(error.to_string(), "Session expired. Please sign in again.");
    }

    #[test]
    fn http_error_displays_backend_message() {
        let error = AppError::Http {
            status: 500,
            message: "HTTP 500".to_owned(),
        };
        assert_eq!(error.status(), Some(500));
        assert_eq!(error.to_string(), "HTTP 500");
    }

    #[test]
    fn transport_error_has_no_status() {
        assert_eq!(AppError::Transport("refused".to_owned()).status(), None);
    }
}
