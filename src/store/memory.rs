//! # In-Memory Store
//!
//! Process-local backend. State is lost on restart.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use super::errors::{StoreError, StoreResult};
use super::models::{Flat, FlatClaim, FlatKey, FlatStatus, House, User};
use super::state::StoreState;
use super::Database;
use crate::auth::Role;

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<StoreState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, StoreState>> {
        self.state.read().map_err(|_| StoreError::LockPoisoned)
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, StoreState>> {
        self.state.write().map_err(|_| StoreError::LockPoisoned)
    }
}

impl Database for MemoryStore {
    fn create_user(&self, user: &User) -> StoreResult<()> {
        self.write()?.insert_user(user)
    }

    fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.read()?.user_by_email(email))
    }

    fn create_house(&self, house: &House) -> StoreResult<()> {
        self.write()?.insert_house(house)
    }

    fn get_house_by_id(&self, house_number: i64) -> StoreResult<Option<House>> {
        Ok(self.read()?.house(house_number))
    }

    fn update_house_flat_time(&self, at: DateTime<Utc>) -> StoreResult<()> {
        self.write()?.touch_flat_time(at);
        Ok(())
    }

    fn create_flat(&self, flat: &Flat) -> StoreResult<()> {
        self.write()?.insert_flat(flat)
    }

    fn create_flat_stamped(&self, flat: &Flat, at: DateTime<Utc>) -> StoreResult<()> {
        self.write()?.insert_flat_stamped(flat, at)
    }

    fn get_flat(&self, key: FlatKey) -> StoreResult<Option<Flat>> {
        Ok(self.read()?.flat(key).cloned())
    }

    fn get_flat_status(&self, key: FlatKey) -> StoreResult<Option<FlatClaim>> {
        Ok(self.read()?.flat_claim(key))
    }

    fn update_flat(&self, key: FlatKey, status: FlatStatus, moderator: &str) -> StoreResult<()> {
        self.write()?.set_flat_status(key, status, moderator)
    }

    fn get_flats_by_house_id(&self, house_number: i64, role_hint: Role) -> StoreResult<Vec<Flat>> {
        Ok(self.read()?.flats_in_house(house_number, role_hint))
    }
}
