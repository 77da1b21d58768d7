//! # JWT Token Management
//!
//! Role-bearing access tokens signed with HS256.
//!
//! Validity is signature + expiry only. Tokens are never revoked
//! server-side and carry no user identifier, just the role.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::{AuthError, AuthResult};
use super::role::Role;

/// Default token lifetime in hours
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 72;

/// Issues and decodes credentials.
///
/// The moderation core only ever sees tokens through this trait.
pub trait TokenAuthority: Send + Sync {
    /// Mint a token asserting `role`
    fn issue(&self, role: Role) -> AuthResult<String>;

    /// Verify a token and return the role it asserts
    fn decode(&self, token: &str) -> AuthResult<Role>;
}

/// JWT claims for access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleClaims {
    /// Asserted role
    pub role: Role,

    /// Issued at timestamp (Unix epoch seconds)
    pub iat: i64,

    /// Expiration timestamp (Unix epoch seconds)
    pub exp: i64,

    /// Token identifier, makes every issued token string distinct
    pub jti: String,
}

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for signing
    pub secret: String,

    /// Access token lifetime
    pub token_ttl: Duration,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, token_ttl_hours: i64) -> Self {
        Self {
            secret: secret.into(),
            token_ttl: Duration::hours(token_ttl_hours),
        }
    }
}

/// JWT manager for token generation and validation
#[derive(Clone)]
pub struct JwtManager {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtManager {
    /// Create a new JWT manager with the given configuration
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Validate a token and extract its claims
    pub fn validate_token(&self, token: &str) -> AuthResult<RoleClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let token_data =
            decode::<RoleClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                    _ => AuthError::MalformedToken,
                }
            })?;

        Ok(token_data.claims)
    }
}

impl TokenAuthority for JwtManager {
    fn issue(&self, role: Role) -> AuthResult<String> {
        let now = Utc::now();
        let claims = RoleClaims {
            role,
            iat: now.timestamp(),
            exp: (now + self.config.token_ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|_| AuthError::TokenGenerationFailed)
    }

    fn decode(&self, token: &str) -> AuthResult<Role> {
        if token.is_empty() {
            return Err(AuthError::MissingCredential);
        }
        self.validate_token(token).map(|claims| claims.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_manager() -> JwtManager {
        JwtManager::new(JwtConfig::new("test_secret_key_for_testing_only", 72))
    }

    fn encode_raw(secret: &str, claims: &serde_json::Value) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_issue_and_decode_round_trip() {
        let manager = create_test_manager();

        let token = manager.issue(Role::Moderator).unwrap();
        assert_eq!(token.split('.').count(), 3);
        assert_eq!(manager.decode(&token).unwrap(), Role::Moderator);
    }

    #[test]
    fn test_expiry_window_is_configured_ttl() {
        let manager = create_test_manager();

        let token = manager.issue(Role::Client).unwrap();
        let claims = manager.validate_token(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, 72 * 3600);
    }

    #[test]
    fn test_tokens_for_same_role_are_distinct() {
        let manager = create_test_manager();

        let a = manager.issue(Role::Moderator).unwrap();
        let b = manager.issue(Role::Moderator).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = JwtManager::new(JwtConfig::new("secret_one", 72));
        let verifier = JwtManager::new(JwtConfig::new("secret_two", 72));

        let token = issuer.issue(Role::Client).unwrap();
        assert!(matches!(
            verifier.decode(&token),
            Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let now = Utc::now();
        let token = encode_raw(
            "test_secret_key_for_testing_only",
            &serde_json::json!({
                "role": "moderator",
                "iat": (now - Duration::hours(80)).timestamp(),
                "exp": (now - Duration::hours(8)).timestamp(),
                "jti": "old",
            }),
        );

        let manager = create_test_manager();
        assert!(matches!(manager.decode(&token), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn test_unknown_role_claim_rejected() {
        let now = Utc::now();
        let token = encode_raw(
            "test_secret_key_for_testing_only",
            &serde_json::json!({
                "role": "admin",
                "iat": now.timestamp(),
                "exp": (now + Duration::hours(1)).timestamp(),
                "jti": "x",
            }),
        );

        let manager = create_test_manager();
        assert!(matches!(manager.decode(&token), Err(AuthError::MalformedToken)));
    }

    #[test]
    fn test_garbage_and_empty_tokens_rejected() {
        let manager = create_test_manager();

        assert!(matches!(
            manager.decode("invalid.token.here"),
            Err(AuthError::MalformedToken) | Err(AuthError::InvalidSignature)
        ));
        assert!(matches!(manager.decode(""), Err(AuthError::MissingCredential)));
    }
}
