//! Authentication and authorization error types.
//!
//! This module defines all error kinds that can cross the core's boundary.
//! The HTTP and message-bus edges translate these into their external
//! representation (status code or reply-error payload) without
//! re-interpreting them.

use std::fmt;

/// Errors that can occur during authentication and authorization operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The request body or parameters are malformed.
    #[error("Bad request: {message}")]
    BadRequest {
        /// Description of what is wrong with the input.
        message: String,
    },

    /// The request lacks valid authentication credentials.
    ///
    /// Covers missing/invalid/expired/tampered tokens, revoked or mismatched
    /// sessions, and disabled users. Deliberately coarse so callers cannot
    /// probe which check failed.
    #[error("Unauthenticated: {message}")]
    Unauthenticated {
        /// Description of why the request is unauthenticated.
        message: String,
    },

    /// The authenticated user does not hold any of the required roles.
    #[error("Forbidden: {message}")]
    Forbidden {
        /// Description of why access is forbidden.
        message: String,
    },

    /// The requested entity does not exist.
    #[error("Not found: {message}")]
    NotFound {
        /// Description of what was not found.
        message: String,
    },

    /// The session referenced during a refresh does not exist.
    #[error("Session not found")]
    SessionNotFound,

    /// The session referenced during a refresh has been revoked.
    #[error("Session revoked")]
    SessionRevoked,

    /// The presented refresh secret does not match the stored hash.
    ///
    /// Raised when a refresh token is replayed after rotation, or when a
    /// concurrent refresh lost the conditional update.
    #[error("Refresh token mismatch")]
    RefreshMismatch,

    /// A downstream dependency (store, message bus) failed or timed out.
    #[error("Dependency unavailable: {message}")]
    DependencyUnavailable {
        /// Description of the failing dependency.
        message: String,
    },

    /// An unexpected internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl AuthError {
    /// Creates a new `BadRequest` error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Creates a new `Unauthenticated` error.
    #[must_use]
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated {
            message: message.into(),
        }
    }

    /// Creates a new `Forbidden` error.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Creates a new `DependencyUnavailable` error.
    #[must_use]
    pub fn dependency_unavailable(message: impl Into<String>) -> Self {
        Self::DependencyUnavailable {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a client error (4xx category).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::BadRequest { .. }
                | Self::Unauthenticated { .. }
                | Self::Forbidden { .. }
                | Self::NotFound { .. }
                | Self::SessionNotFound
                | Self::SessionRevoked
                | Self::RefreshMismatch
        )
    }

    /// Returns `true` if this is a server error (5xx category).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::DependencyUnavailable { .. } | Self::Internal { .. }
        )
    }

    /// Returns `true` if this error denies authentication (as opposed to
    /// authorization or input validation).
    #[must_use]
    pub fn is_authentication_error(&self) -> bool {
        matches!(
            self,
            Self::Unauthenticated { .. }
                | Self::SessionNotFound
                | Self::SessionRevoked
                | Self::RefreshMismatch
        )
    }

    /// Returns the stable kind discriminator used in bus reply payloads.
    #[must_use]
    pub fn kind_str(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => "bad_request",
            Self::Unauthenticated { .. } => "unauthenticated",
            Self::Forbidden { .. } => "forbidden",
            Self::NotFound { .. } => "not_found",
            Self::SessionNotFound => "session_not_found",
            Self::SessionRevoked => "session_revoked",
            Self::RefreshMismatch => "refresh_mismatch",
            Self::DependencyUnavailable { .. } => "dependency_unavailable",
            Self::Internal { .. } => "internal",
        }
    }

    /// Rebuilds an error from a bus reply `(kind, message)` pair.
    ///
    /// Unknown kinds map to `Internal` so a newer authority cannot make an
    /// older caller panic.
    #[must_use]
    pub fn from_kind_str(kind: &str, message: &str) -> Self {
        match kind {
            "bad_request" => Self::bad_request(message),
            "unauthenticated" => Self::unauthenticated(message),
            "forbidden" => Self::forbidden(message),
            "not_found" => Self::not_found(message),
            "session_not_found" => Self::SessionNotFound,
            "session_revoked" => Self::SessionRevoked,
            "refresh_mismatch" => Self::RefreshMismatch,
            "dependency_unavailable" => Self::dependency_unavailable(message),
            _ => Self::internal(message),
        }
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::BadRequest { .. } => ErrorCategory::Validation,
            Self::Unauthenticated { .. } => ErrorCategory::Authentication,
            Self::Forbidden { .. } => ErrorCategory::Authorization,
            Self::NotFound { .. } => ErrorCategory::Validation,
            Self::SessionNotFound | Self::SessionRevoked | Self::RefreshMismatch => {
                ErrorCategory::Session
            }
            Self::DependencyUnavailable { .. } => ErrorCategory::Infrastructure,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Categories of auth errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Identity verification failures.
    Authentication,
    /// Permission check failures.
    Authorization,
    /// Session lifecycle failures (refresh/rotation).
    Session,
    /// Request validation failures.
    Validation,
    /// Store or bus failures.
    Infrastructure,
    /// Unexpected internal errors.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authentication => write!(f, "authentication"),
            Self::Authorization => write!(f, "authorization"),
            Self::Session => write!(f, "session"),
            Self::Validation => write!(f, "validation"),
            Self::Infrastructure => write!(f, "infrastructure"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AuthError::unauthenticated("missing bearer token");
        assert_eq!(err.to_string(), "Unauthenticated: missing bearer token");

        let err = AuthError::RefreshMismatch;
        assert_eq!(err.to_string(), "Refresh token mismatch");

        let err = AuthError::forbidden("requires EDITOR");
        assert_eq!(err.to_string(), "Forbidden: requires EDITOR");
    }

    #[test]
    fn test_error_predicates() {
        let err = AuthError::unauthenticated("test");
        assert!(err.is_client_error());
        assert!(!err.is_server_error());
        assert!(err.is_authentication_error());

        let err = AuthError::forbidden("test");
        assert!(err.is_client_error());
        assert!(!err.is_authentication_error());

        let err = AuthError::SessionRevoked;
        assert!(err.is_authentication_error());

        let err = AuthError::dependency_unavailable("store down");
        assert!(err.is_server_error());
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_kind_round_trip() {
        let errors = [
            AuthError::bad_request("x"),
            AuthError::unauthenticated("x"),
            AuthError::forbidden("x"),
            AuthError::not_found("x"),
            AuthError::SessionNotFound,
            AuthError::SessionRevoked,
            AuthError::RefreshMismatch,
            AuthError::dependency_unavailable("x"),
            AuthError::internal("x"),
        ];
        for err in errors {
            let rebuilt = AuthError::from_kind_str(err.kind_str(), "x");
            assert_eq!(rebuilt.kind_str(), err.kind_str());
        }
    }

    #[test]
    fn test_unknown_kind_maps_to_internal() {
        let err = AuthError::from_kind_str("quota_exceeded", "later version");
        assert_eq!(err.kind_str(), "internal");
    }

    #[test]
    fn test_error_category() {
        assert_eq!(
            AuthError::unauthenticated("test").category(),
            ErrorCategory::Authentication
        );
        assert_eq!(
            AuthError::forbidden("test").category(),
            ErrorCategory::Authorization
        );
        assert_eq!(AuthError::RefreshMismatch.category(), ErrorCategory::Session);
        assert_eq!(
            AuthError::dependency_unavailable("test").category(),
            ErrorCategory::Infrastructure
        );
    }
}
