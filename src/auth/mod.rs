//! # Auth Module
//!
//! Credential issuance and verification, plus password hashing.
//!
//! The moderation core consumes this module only through
//! [`TokenAuthority`]: issue a token for a role, decode a token back into
//! its role.

pub mod crypto;
pub mod errors;
pub mod jwt;
pub mod role;

pub use errors::{AuthError, AuthResult};
pub use jwt::{JwtConfig, JwtManager, RoleClaims, TokenAuthority, DEFAULT_TOKEN_TTL_HOURS};
pub use role::Role;
