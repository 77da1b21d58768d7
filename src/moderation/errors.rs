//! # Moderation Errors
//!
//! Every failure is terminal for the current operation and is reported to
//! the caller as-is. Nothing here is retried.

use thiserror::Error;

use crate::auth::AuthError;
use crate::store::StoreError;

/// Result type for moderation operations
pub type ModerationResult<T> = Result<T, ModerationError>;

#[derive(Debug, Clone, Error)]
pub enum ModerationError {
    /// Unknown house, flat or user
    #[error("{0} not found")]
    NotFound(String),

    /// Another moderator holds the review claim on this flat
    #[error("another moderator has already been assigned to this flat")]
    Conflict,

    /// Requested status outside the fixed status set
    #[error("wrong status for the flat: '{0}'")]
    InvalidStatus(String),

    /// Missing, invalid or expired credential, or a bad password
    #[error("not authorized: {0}")]
    Unauthorized(AuthError),

    /// Valid credential with the wrong role
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Duplicate email, house number or flat key
    #[error("{0} already exists")]
    AlreadyExists(String),

    /// Request payload failed validation
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Store failure
    #[error("storage error: {0}")]
    Storage(StoreError),

    /// Credential issuance or password hashing failure
    #[error("internal error: {0}")]
    Internal(String),
}

impl ModerationError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            ModerationError::InvalidStatus(_) => 400,
            ModerationError::InvalidInput(_) => 400,
            ModerationError::Unauthorized(_) => 401,
            ModerationError::Forbidden(_) => 403,
            ModerationError::NotFound(_) => 404,
            ModerationError::Conflict => 409,
            ModerationError::AlreadyExists(_) => 409,
            ModerationError::Storage(_) => 500,
            ModerationError::Internal(_) => 500,
        }
    }

    /// Client-caused failures are logged at warn level, the rest at error
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

impl From<StoreError> for ModerationError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(what) => ModerationError::AlreadyExists(what),
            StoreError::MissingParent(what) | StoreError::MissingRecord(what) => {
                ModerationError::NotFound(what)
            }
            other => ModerationError::Storage(other),
        }
    }
}

impl From<AuthError> for ModerationError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::UnknownRole(role) => {
                ModerationError::InvalidInput(format!("invalid user type '{}'", role))
            }
            AuthError::HashingFailed | AuthError::TokenGenerationFailed => {
                ModerationError::Internal(err.to_string())
            }
            other => ModerationError::Unauthorized(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(ModerationError::Conflict.status_code(), 409);
        assert_eq!(ModerationError::InvalidStatus("x".into()).status_code(), 400);
        assert_eq!(
            ModerationError::Unauthorized(AuthError::TokenExpired).status_code(),
            401
        );
        assert_eq!(ModerationError::Forbidden("client".into()).status_code(), 403);
        assert_eq!(ModerationError::AlreadyExists("user".into()).status_code(), 409);
        assert_eq!(ModerationError::Storage(StoreError::LockPoisoned).status_code(), 500);
    }

    #[test]
    fn test_store_error_mapping() {
        assert!(matches!(
            ModerationError::from(StoreError::Duplicate("house 1".into())),
            ModerationError::AlreadyExists(_)
        ));
        assert!(matches!(
            ModerationError::from(StoreError::MissingParent("house 1".into())),
            ModerationError::NotFound(_)
        ));
        assert!(matches!(
            ModerationError::from(StoreError::Io("disk".into())),
            ModerationError::Storage(_)
        ));
    }

    #[test]
    fn test_auth_error_mapping() {
        assert!(matches!(
            ModerationError::from(AuthError::InvalidSignature),
            ModerationError::Unauthorized(AuthError::InvalidSignature)
        ));
        assert!(matches!(
            ModerationError::from(AuthError::UnknownRole("admin".into())),
            ModerationError::InvalidInput(_)
        ));
        assert!(!ModerationError::from(AuthError::HashingFailed).is_client_error());
    }
}
