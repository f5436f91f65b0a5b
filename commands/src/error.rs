//! Classified command errors.

use flashcards_core::RepositoryError;
use thiserror::Error;

/// Error returned by every command.
///
/// Each failed command yields exactly one of these kinds; transports map the
/// kind to their own status codes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Malformed or missing fields, or a non-positive id.
    ///
    /// Raised before any collaborator is called.
    #[error("{0}")]
    InvalidArgument(String),

    /// The addressed entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Storage failure or any unclassified repository error.
    #[error("{0}")]
    Internal(String),
}

/// Discriminant of [`CommandError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`CommandError::InvalidArgument`].
    InvalidArgument,
    /// See [`CommandError::NotFound`].
    NotFound,
    /// See [`CommandError::Internal`].
    Internal,
}

impl ErrorKind {
    /// Snake-case label, used as the metrics outcome.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidArgument => "invalid_argument",
            Self::NotFound => "not_found",
            Self::Internal => "internal",
        }
    }
}

impl CommandError {
    /// The error's kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Invalid-argument error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Not-found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Classify a repository error: the not-found sentinel becomes
    /// [`NotFound`](Self::NotFound) with `not_found_message`, anything else is
    /// logged and becomes [`Internal`](Self::Internal) with `internal_message`.
    ///
    /// Storage error text never reaches the caller.
    #[must_use]
    pub fn from_repository(
        error: &RepositoryError,
        not_found_message: &str,
        internal_message: &str,
    ) -> Self {
        if error.is_not_found() {
            Self::not_found(not_found_message)
        } else {
            tracing::error!(error = %error, "{internal_message}");
            Self::internal(internal_message)
        }
    }
}
