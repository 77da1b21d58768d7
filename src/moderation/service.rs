//! # Moderation Service
//!
//! Entry point for every operation: account handling, house and flat
//! creation, flat transitions and listings.
//!
//! Control flow per request:
//! 1. the guard resolves the caller from the credential;
//! 2. mutations run inside the write gate against the store;
//! 3. listings pass through the visibility filter before returning.

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;

use super::errors::{ModerationError, ModerationResult};
use super::gate::WriteGate;
use super::guard::AuthGuard;
use super::state_machine::{apply_transition, TransitionRequest};
use super::visibility::filter_visible;
use crate::auth::crypto::{hash_password, verify_password};
use crate::auth::{AuthError, Role, TokenAuthority};
use crate::store::{Database, Flat, FlatStatus, House, User};

/// Account creation request
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub user_type: Role,
}

/// Login request
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// House creation request
#[derive(Debug, Clone, Deserialize)]
pub struct NewHouse {
    pub house_number: i64,
    pub address: String,
    pub year_built: i32,
    #[serde(default)]
    pub developer: Option<String>,
}

/// Flat creation request
#[derive(Debug, Clone, Deserialize)]
pub struct NewFlat {
    pub house_number: i64,
    pub flat_number: i64,
    pub price: i64,
    pub rooms: i32,
}

fn require(condition: bool, message: &str) -> ModerationResult<()> {
    if condition {
        Ok(())
    } else {
        Err(ModerationError::InvalidInput(message.to_string()))
    }
}

pub struct ModerationService {
    store: Arc<dyn Database>,
    authority: Arc<dyn TokenAuthority>,
    guard: AuthGuard,
    gate: WriteGate,
}

impl ModerationService {
    pub fn new(store: Arc<dyn Database>, authority: Arc<dyn TokenAuthority>) -> Self {
        Self {
            store,
            guard: AuthGuard::new(authority.clone()),
            authority,
            gate: WriteGate::new(),
        }
    }

    pub fn guard(&self) -> &AuthGuard {
        &self.guard
    }

    // ==================
    // Accounts
    // ==================

    /// Issue a token for `role` without an account
    pub fn dummy_login(&self, role: Role) -> ModerationResult<String> {
        let token = self.authority.issue(role)?;
        info!(%role, "issued dummy token");
        Ok(token)
    }

    pub fn register(&self, request: RegisterRequest) -> ModerationResult<User> {
        let email = request.email.trim().to_string();
        require(!email.is_empty(), "email must not be empty")?;
        require(!request.password.is_empty(), "password must not be empty")?;

        let password_hash = hash_password(&request.password)?;

        self.gate.run(|| {
            if self.store.get_user_by_email(&email)?.is_some() {
                return Err(ModerationError::AlreadyExists(format!("user {}", email)));
            }

            let user = User {
                id: Uuid::new_v4(),
                email: email.clone(),
                password_hash,
                role: request.user_type,
            };
            self.store.create_user(&user)?;

            info!(user_id = %user.id, role = %user.role, "user registered");
            Ok(user)
        })
    }

    /// Check the password and issue a token for the account's role
    pub fn login(&self, request: LoginRequest) -> ModerationResult<String> {
        let email = request.email.trim();

        let user = self.gate.run(|| {
            self.store
                .get_user_by_email(email)?
                .ok_or_else(|| ModerationError::NotFound(format!("user {}", email)))
        })?;

        if !verify_password(&request.password, &user.password_hash)? {
            return Err(ModerationError::Unauthorized(AuthError::InvalidCredentials));
        }

        let token = self.authority.issue(user.role)?;
        info!(user_id = %user.id, role = %user.role, "user logged in");
        Ok(token)
    }

    // ==================
    // Houses and flats
    // ==================

    pub fn create_house(&self, credential: Option<&str>, new: NewHouse) -> ModerationResult<House> {
        self.guard.require_moderator(credential)?;
        require(new.house_number > 0, "house_number must be positive")?;
        require(!new.address.trim().is_empty(), "address must not be empty")?;
        require(new.year_built > 0, "year_built must be positive")?;

        let house = House {
            house_number: new.house_number,
            address: new.address,
            year_built: new.year_built,
            developer: new.developer.filter(|d| !d.trim().is_empty()),
            created_at: Utc::now(),
            last_flat_added_at: None,
        };

        self.gate.run(|| {
            self.store.create_house(&house)?;
            info!(house_number = house.house_number, "house created");
            Ok(house.clone())
        })
    }

    /// Create a flat in status `created` with no claim.
    ///
    /// Afterwards `last_flat_added_at` is stamped on every house, not just
    /// the flat's own house.
    pub fn create_flat(&self, credential: Option<&str>, new: NewFlat) -> ModerationResult<Flat> {
        self.guard.require_moderator(credential)?;
        require(new.flat_number > 0, "flat_number must be positive")?;
        require(new.price >= 0, "price must not be negative")?;
        require(new.rooms > 0, "rooms must be positive")?;

        let flat = Flat {
            house_number: new.house_number,
            flat_number: new.flat_number,
            price: new.price,
            rooms: new.rooms,
            status: FlatStatus::Created,
            moderator: String::new(),
        };

        self.gate.run(|| {
            self.store.create_flat_stamped(&flat, Utc::now())?;

            info!(
                house_number = flat.house_number,
                flat_number = flat.flat_number,
                "flat created"
            );
            Ok(flat.clone())
        })
    }

    /// Move a flat to `status` on behalf of the calling moderator
    pub fn update_flat(
        &self,
        credential: Option<&str>,
        house_number: i64,
        flat_number: i64,
        status: &str,
    ) -> ModerationResult<Flat> {
        let moderator = self.guard.require_moderator(credential)?;
        let request = TransitionRequest::new(house_number, flat_number, status);

        self.gate
            .run(|| apply_transition(self.store.as_ref(), &request, &moderator))
    }

    // ==================
    // Read path
    // ==================

    /// Flats of a house as the caller's role may see them
    pub fn list_flats(&self, credential: Option<&str>, house_number: i64) -> ModerationResult<Vec<Flat>> {
        let role = self.guard.resolve_role(credential)?;

        if self.store.get_house_by_id(house_number)?.is_none() {
            return Err(ModerationError::NotFound(format!("house {}", house_number)));
        }

        let flats = self.store.get_flats_by_house_id(house_number, role)?;
        let visible = filter_visible(flats, role);

        debug!(house_number, %role, count = visible.len(), "listed flats");
        Ok(visible)
    }

    /// Subscribe a client to new flats of a house
    pub fn subscribe(&self, credential: Option<&str>, house_number: i64) -> ModerationResult<()> {
        let role = self.guard.resolve_role(credential)?;
        if role != Role::Client {
            return Err(ModerationError::Forbidden(
                "subscribe for clients only".to_string(),
            ));
        }

        if self.store.get_house_by_id(house_number)?.is_none() {
            return Err(ModerationError::NotFound(format!("house {}", house_number)));
        }

        info!(house_number, "client subscribed");
        Ok(())
    }
}
