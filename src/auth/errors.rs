//! # Auth Errors
//!
//! Error types for credential issuance and verification.

use thiserror::Error;

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Credential and password errors
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    // ==================
    // Credential Errors
    // ==================

    /// No credential was presented
    #[error("Missing authorization token")]
    MissingCredential,

    /// Token could not be parsed or carries unexpected claims
    #[error("Malformed token")]
    MalformedToken,

    /// Token expiry has passed
    #[error("Token expired")]
    TokenExpired,

    /// Token signature does not match the signing key
    #[error("Invalid token signature")]
    InvalidSignature,

    /// Role string outside the closed role set
    #[error("Invalid user type: {0}")]
    UnknownRole(String),

    // ==================
    // Password Errors
    // ==================

    /// Password does not match the stored hash
    #[error("Invalid credentials")]
    InvalidCredentials,

    // ==================
    // Internal Errors
    // ==================

    /// Password hashing failed
    #[error("Failed to hash password")]
    HashingFailed,

    /// Token signing failed
    #[error("Failed to generate token")]
    TokenGenerationFailed,
}
