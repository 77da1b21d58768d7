//! # Authorization Guard
//!
//! Resolves the caller behind a credential. Decoding is lock-free and has
//! no side effects.
//!
//! The identity returned by [`AuthGuard::require_moderator`] is the raw
//! credential string. A moderator who obtains a new token is a different
//! identity as far as review claims are concerned.

use std::fmt;
use std::sync::Arc;

use tracing::warn;

use super::errors::{ModerationError, ModerationResult};
use crate::auth::{AuthError, Role, TokenAuthority};

/// Claim identity of an authenticated moderator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeratorId(String);

impl ModeratorId {
    pub fn new(identity: impl Into<String>) -> Self {
        Self(identity.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Identities are credentials; keep them out of logs and error messages.
impl fmt::Display for ModeratorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<moderator>")
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
///
/// Anything other than exactly two space-separated parts yields `None`.
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    let mut parts = header?.split(' ');
    let (_scheme, token) = (parts.next()?, parts.next()?);
    if parts.next().is_some() || token.is_empty() {
        return None;
    }
    Some(token)
}

#[derive(Clone)]
pub struct AuthGuard {
    authority: Arc<dyn TokenAuthority>,
}

impl AuthGuard {
    pub fn new(authority: Arc<dyn TokenAuthority>) -> Self {
        Self { authority }
    }

    /// Decode the credential without any role restriction
    pub fn resolve_role(&self, credential: Option<&str>) -> ModerationResult<Role> {
        let token = credential.ok_or(ModerationError::Unauthorized(AuthError::MissingCredential))?;

        self.authority.decode(token).map_err(|e| {
            warn!(reason = %e, "credential rejected");
            ModerationError::Unauthorized(e)
        })
    }

    /// Decode the credential and require the moderator role
    pub fn require_moderator(&self, credential: Option<&str>) -> ModerationResult<ModeratorId> {
        let token = credential.ok_or(ModerationError::Unauthorized(AuthError::MissingCredential))?;

        let role = self.resolve_role(Some(token))?;
        if !role.is_moderator() {
            warn!(%role, "moderator role required");
            return Err(ModerationError::Forbidden(format!(
                "role '{}' may not perform this operation",
                role
            )));
        }

        Ok(ModeratorId::new(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{JwtConfig, JwtManager};

    fn guard() -> (AuthGuard, Arc<JwtManager>) {
        let jwt = Arc::new(JwtManager::new(JwtConfig::new("guard-test-secret", 72)));
        (AuthGuard::new(jwt.clone()), jwt)
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(Some("Bearer abc")), Some("abc"));
        assert_eq!(bearer_token(Some("abc")), None);
        assert_eq!(bearer_token(Some("Bearer a b")), None);
        assert_eq!(bearer_token(Some("Bearer ")), None);
        assert_eq!(bearer_token(None), None);
    }

    #[test]
    fn test_require_moderator_returns_raw_credential() {
        let (guard, jwt) = guard();
        let token = jwt.issue(Role::Moderator).unwrap();

        let id = guard.require_moderator(Some(&token)).unwrap();
        assert_eq!(id.as_str(), token);
        assert_eq!(id.to_string(), "<moderator>");
    }

    #[test]
    fn test_client_is_forbidden() {
        let (guard, jwt) = guard();
        let token = jwt.issue(Role::Client).unwrap();

        assert!(matches!(
            guard.require_moderator(Some(&token)),
            Err(ModerationError::Forbidden(_))
        ));
        assert_eq!(guard.resolve_role(Some(&token)).unwrap(), Role::Client);
    }

    #[test]
    fn test_missing_or_bad_credential_is_unauthorized() {
        let (guard, _) = guard();

        assert!(matches!(
            guard.resolve_role(None),
            Err(ModerationError::Unauthorized(AuthError::MissingCredential))
        ));
        assert!(matches!(
            guard.require_moderator(Some("nope")),
            Err(ModerationError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_foreign_signature_is_unauthorized() {
        let (guard, _) = guard();
        let other = JwtManager::new(JwtConfig::new("someone-else", 72));
        let token = other.issue(Role::Moderator).unwrap();

        assert!(matches!(
            guard.require_moderator(Some(&token)),
            Err(ModerationError::Unauthorized(AuthError::InvalidSignature))
        ));
    }
}
