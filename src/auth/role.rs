//! # Roles
//!
//! The only authorization dimension of the service.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::AuthError;

/// Caller role carried inside every credential
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Sees approved flats, may subscribe to houses
    Client,
    /// Creates houses and flats, moderates flats, sees everything
    Moderator,
}

impl Role {
    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Moderator => "moderator",
        }
    }

    pub fn is_moderator(&self) -> bool {
        matches!(self, Role::Moderator)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" => Ok(Role::Client),
            "moderator" => Ok(Role::Moderator),
            other => Err(AuthError::UnknownRole(other.to_string())),
        }
    }
}
