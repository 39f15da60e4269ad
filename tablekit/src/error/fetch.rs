//! Remote fetch error types

use serde::Deserialize;
use serde::Serialize;

/// Classification of a failed remote fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FetchErrorKind {
    /// Transport-level failure (connection refused, DNS, timeout).
    Network,
    /// The remote source returned a server-side error.
    Server,
    /// The remote source rejected the request as malformed.
    Validation,
    /// The session is no longer authorized. Escalated to the
    /// [`SessionGuard`](crate::session::SessionGuard) instead of being
    /// surfaced as a table error.
    Unauthorized,
}

/// Error returned by a [`DataSource`](crate::source::DataSource) fetch.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind:?} error: {message}")]
pub struct FetchError {
    /// Failure classification.
    pub kind: FetchErrorKind,
    /// Human-readable message.
    pub message: String,
}

impl FetchError {
    /// Creates a fetch error with the given kind and message.
    pub fn new(kind: FetchErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::Network, message)
    }

    /// Creates a server error.
    pub fn server(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::Server, message)
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::Validation, message)
    }

    /// Creates an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::Unauthorized, message)
    }

    /// Returns `true` if this is an unauthorized failure.
    pub fn is_unauthorized(&self) -> bool {
        self.kind == FetchErrorKind::Unauthorized
    }

    /// Returns `true` if retrying the same request may succeed.
    ///
    /// Network and server failures are transient; validation and
    /// unauthorized failures are not.
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind, FetchErrorKind::Network | FetchErrorKind::Server)
    }
}
