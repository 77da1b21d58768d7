//! # Store State
//!
//! The keyed record maps shared by every store backend. All maps are
//! ordered so that serialization is deterministic, which the snapshot
//! checksum relies on.
//!
//! Every mutating method checks its preconditions before touching a map,
//! so a failed call leaves the state unchanged.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::{StoreError, StoreResult};
use super::models::{Flat, FlatClaim, FlatKey, FlatStatus, House, User};
use crate::auth::Role;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreState {
    /// Users keyed by email
    #[serde(default)]
    users: BTreeMap<String, User>,

    /// Houses keyed by house number
    #[serde(default)]
    houses: BTreeMap<i64, House>,

    /// Flats keyed by house number, then flat number
    #[serde(default)]
    flats: BTreeMap<i64, BTreeMap<i64, Flat>>,
}

impl StoreState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_user(&mut self, user: &User) -> StoreResult<()> {
        if self.users.contains_key(&user.email) {
            return Err(StoreError::Duplicate(format!("user {}", user.email)));
        }
        self.users.insert(user.email.clone(), user.clone());
        Ok(())
    }

    pub fn user_by_email(&self, email: &str) -> Option<User> {
        self.users.get(email).cloned()
    }

    pub fn insert_house(&mut self, house: &House) -> StoreResult<()> {
        if self.houses.contains_key(&house.house_number) {
            return Err(StoreError::Duplicate(format!("house {}", house.house_number)));
        }
        self.houses.insert(house.house_number, house.clone());
        Ok(())
    }

    pub fn house(&self, house_number: i64) -> Option<House> {
        self.houses.get(&house_number).cloned()
    }

    /// Stamps `at` on every house, not only the one that gained a flat.
    pub fn touch_flat_time(&mut self, at: DateTime<Utc>) {
        for house in self.houses.values_mut() {
            house.last_flat_added_at = Some(at);
        }
    }

    pub fn insert_flat(&mut self, flat: &Flat) -> StoreResult<()> {
        if !self.houses.contains_key(&flat.house_number) {
            return Err(StoreError::MissingParent(format!("house {}", flat.house_number)));
        }

        let flats = self.flats.entry(flat.house_number).or_default();
        if flats.contains_key(&flat.flat_number) {
            return Err(StoreError::Duplicate(flat.key().to_string()));
        }
        flats.insert(flat.flat_number, flat.clone());
        Ok(())
    }

    /// Insert a flat and stamp every house with `at`, or do neither.
    pub fn insert_flat_stamped(&mut self, flat: &Flat, at: DateTime<Utc>) -> StoreResult<()> {
        self.insert_flat(flat)?;
        self.touch_flat_time(at);
        Ok(())
    }

    pub fn flat(&self, key: FlatKey) -> Option<&Flat> {
        self.flats
            .get(&key.house_number)
            .and_then(|flats| flats.get(&key.flat_number))
    }

    pub fn flat_claim(&self, key: FlatKey) -> Option<FlatClaim> {
        self.flat(key).map(FlatClaim::from)
    }

    pub fn set_flat_status(
        &mut self,
        key: FlatKey,
        status: FlatStatus,
        moderator: &str,
    ) -> StoreResult<()> {
        let flat = self
            .flats
            .get_mut(&key.house_number)
            .and_then(|flats| flats.get_mut(&key.flat_number))
            .ok_or_else(|| StoreError::MissingRecord(key.to_string()))?;

        flat.status = status;
        flat.moderator = moderator.to_string();
        Ok(())
    }

    /// Flats of a house ordered by flat number. Clients only get
    /// approved flats.
    pub fn flats_in_house(&self, house_number: i64, role_hint: Role) -> Vec<Flat> {
        let Some(flats) = self.flats.get(&house_number) else {
            return Vec::new();
        };

        flats
            .values()
            .filter(|flat| match role_hint {
                Role::Moderator => true,
                Role::Client => flat.status == FlatStatus::Approved,
            })
            .cloned()
            .collect()
    }
}
