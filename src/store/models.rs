//! # Records
//!
//! Users, houses and flats as they are persisted.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::Role;

/// Registered account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,

    /// Email address (unique)
    pub email: String,

    /// Argon2id password hash
    pub password_hash: String,

    /// Role granted to every token issued at login
    #[serde(rename = "user_type")]
    pub role: Role,
}

/// Apartment building
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct House {
    /// House number (unique)
    pub house_number: i64,

    pub address: String,

    pub year_built: i32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub developer: Option<String>,

    pub created_at: DateTime<Utc>,

    /// Time of the most recent flat creation anywhere in the service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_flat_added_at: Option<DateTime<Utc>>,
}

/// Moderation status of a flat.
///
/// `OnModeration` is `"on moderation"` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlatStatus {
    #[serde(rename = "created")]
    Created,
    #[serde(rename = "on moderation")]
    OnModeration,
    #[serde(rename = "approved")]
    Approved,
    #[serde(rename = "declined")]
    Declined,
}

impl FlatStatus {
    pub const ALL: [FlatStatus; 4] = [
        FlatStatus::Created,
        FlatStatus::OnModeration,
        FlatStatus::Approved,
        FlatStatus::Declined,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FlatStatus::Created => "created",
            FlatStatus::OnModeration => "on moderation",
            FlatStatus::Approved => "approved",
            FlatStatus::Declined => "declined",
        }
    }
}

impl fmt::Display for FlatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a status string outside the fixed set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown flat status '{}'", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for FlatStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FlatStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Compound flat identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlatKey {
    pub house_number: i64,
    pub flat_number: i64,
}

impl FlatKey {
    pub fn new(house_number: i64, flat_number: i64) -> Self {
        Self {
            house_number,
            flat_number,
        }
    }
}

impl fmt::Display for FlatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "house {} flat {}", self.house_number, self.flat_number)
    }
}

/// Flat listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flat {
    pub house_number: i64,

    pub flat_number: i64,

    pub price: i64,

    pub rooms: i32,

    pub status: FlatStatus,

    /// Identity of the moderator holding the review claim; empty when unclaimed
    #[serde(default)]
    pub moderator: String,
}

impl Flat {
    pub fn key(&self) -> FlatKey {
        FlatKey::new(self.house_number, self.flat_number)
    }
}

/// Status and claim of a flat, the part the state machine checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatClaim {
    pub status: FlatStatus,
    pub moderator: String,
}

impl From<&Flat> for FlatClaim {
    fn from(flat: &Flat) -> Self {
        Self {
            status: flat.status,
            moderator: flat.moderator.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_values() {
        assert_eq!(
            serde_json::to_string(&FlatStatus::OnModeration).unwrap(),
            "\"on moderation\""
        );
        assert_eq!(
            "on moderation".parse::<FlatStatus>().unwrap(),
            FlatStatus::OnModeration
        );
        assert!("on_moderation".parse::<FlatStatus>().is_err());
        assert!("APPROVED".parse::<FlatStatus>().is_err());
    }

    #[test]
    fn test_display_matches_parse() {
        for status in FlatStatus::ALL {
            assert_eq!(status.to_string().parse::<FlatStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_user_role_serialized_as_user_type() {
        let user = User {
            id: Uuid::new_v4(),
            email: "a@b.c".to_string(),
            password_hash: "$argon2id$hash".to_string(),
            role: Role::Client,
        };

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["user_type"], "client");
    }

    #[test]
    fn test_flat_claim_from_flat() {
        let mut flat = Flat {
            house_number: 1,
            flat_number: 2,
            price: 100,
            rooms: 3,
            status: FlatStatus::Created,
            moderator: String::new(),
        };
        flat.moderator = "token".to_string();

        let claim = FlatClaim::from(&flat);
        assert_eq!(claim.status, FlatStatus::Created);
        assert_eq!(claim.moderator, "token");
        assert_eq!(flat.key(), FlatKey::new(1, 2));
    }
}
