//! Unified error types for the Catchu client core
//!
//! This module defines error types for each layer:
//! - `DomainError`: Core business logic errors
//! - `StoreError`: Document backend client errors
//! - `FeedError`: User-facing feed errors (kind + displayable message)

use thiserror::Error;

/// Domain layer errors - pure business logic errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Classify the error for user messaging
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::Unauthenticated(_) | DomainError::PermissionDenied(_) => {
                ErrorKind::Unauthorized
            }
            _ => ErrorKind::Transient,
        }
    }
}

/// Document backend client errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Unauthorized - missing or invalid token")]
    Unauthorized,

    #[error("Permission denied")]
    PermissionDenied,

    #[error("Rate limited")]
    RateLimited,

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Invalid client configuration: {0}")]
    Config(String),
}

impl From<StoreError> for DomainError {
    fn from(e: StoreError) -> Self {
        match &e {
            StoreError::Unauthorized => DomainError::Unauthenticated(e.to_string()),
            StoreError::PermissionDenied => DomainError::PermissionDenied(e.to_string()),
            StoreError::Api { status: 404, message } => DomainError::NotFound(message.clone()),
            StoreError::Deserialization(msg) => {
                DomainError::Internal(format!("Malformed document: {}", msg))
            }
            StoreError::Config(msg) => DomainError::Internal(msg.clone()),
            StoreError::Request(_) | StoreError::RateLimited | StoreError::Api { .. } => {
                DomainError::Unavailable(e.to_string())
            }
        }
    }
}

/// What the user can do about a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller lacks permission - the remedy is to sign in
    Unauthorized,
    /// Connectivity or server-side failure - the remedy is to retry
    Transient,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Unauthorized => write!(f, "unauthorized"),
            ErrorKind::Transient => write!(f, "transient"),
        }
    }
}

/// Which feed source produced an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorSource {
    Subscription,
    Pagination,
}

/// A recoverable feed error, safe to show to the user
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FeedError {
    pub kind: ErrorKind,
    pub origin: ErrorSource,
    pub message: String,
}

impl FeedError {
    pub fn subscription(err: &DomainError) -> Self {
        let kind = err.kind();
        let message = match kind {
            ErrorKind::Unauthorized => {
                "You don't have access to the feed. Check that you are signed in and allowed to read posts."
            }
            ErrorKind::Transient => {
                "Could not load the feed. Check your network connection and refresh."
            }
        };
        Self {
            kind,
            origin: ErrorSource::Subscription,
            message: message.to_string(),
        }
    }

    pub fn pagination(err: &DomainError) -> Self {
        let kind = err.kind();
        let message = match kind {
            ErrorKind::Unauthorized => "You don't have access to older posts. Please sign in again.",
            ErrorKind::Transient => "Could not load more posts. Please try again shortly.",
        };
        Self {
            kind,
            origin: ErrorSource::Pagination,
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_errors_are_unauthorized() {
        assert_eq!(
            DomainError::PermissionDenied("rules".into()).kind(),
            ErrorKind::Unauthorized
        );
        assert_eq!(
            DomainError::Unauthenticated("no session".into()).kind(),
            ErrorKind::Unauthorized
        );
    }

    #[test]
    fn other_errors_are_transient() {
        assert_eq!(
            DomainError::Unavailable("timeout".into()).kind(),
            ErrorKind::Transient
        );
        assert_eq!(DomainError::Internal("x".into()).kind(), ErrorKind::Transient);
    }

    #[test]
    fn store_errors_map_to_domain() {
        assert!(matches!(
            DomainError::from(StoreError::PermissionDenied),
            DomainError::PermissionDenied(_)
        ));
        assert!(matches!(
            DomainError::from(StoreError::Unauthorized),
            DomainError::Unauthenticated(_)
        ));
        assert!(matches!(
            DomainError::from(StoreError::RateLimited),
            DomainError::Unavailable(_)
        ));
        assert!(matches!(
            DomainError::from(StoreError::Api {
                status: 404,
                message: "gone".into()
            }),
            DomainError::NotFound(_)
        ));
    }

    #[test]
    fn feed_error_carries_origin_and_kind() {
        let err = FeedError::pagination(&DomainError::Unavailable("down".into()));
        assert_eq!(err.kind, ErrorKind::Transient);
        assert_eq!(err.origin, ErrorSource::Pagination);
        assert!(err.to_string().contains("try again"));
    }
}
