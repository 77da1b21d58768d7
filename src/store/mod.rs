//! # Store Module
//!
//! Durable keyed storage for users, houses and flats.
//!
//! Flats are addressed by the compound key (house number, flat number).
//! Reads report an absent key as `None` or an empty list, never as an
//! error. Backends:
//!
//! - [`MemoryStore`]: process-local maps
//! - [`FileStore`]: the same maps plus a checksummed JSON snapshot on disk

pub mod errors;
pub mod file;
pub mod memory;
pub mod models;
pub mod state;

use chrono::{DateTime, Utc};

use crate::auth::Role;

pub use errors::{StoreError, StoreResult};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use models::{Flat, FlatClaim, FlatKey, FlatStatus, House, UnknownStatus, User};
pub use state::StoreState;

/// Persistence interface consumed by the moderation service
pub trait Database: Send + Sync {
    /// Insert a user; fails with `Duplicate` when the email is taken
    fn create_user(&self, user: &User) -> StoreResult<()>;

    fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Insert a house; fails with `Duplicate` when the number is taken
    fn create_house(&self, house: &House) -> StoreResult<()>;

    fn get_house_by_id(&self, house_number: i64) -> StoreResult<Option<House>>;

    /// Set `last_flat_added_at` on every house
    fn update_house_flat_time(&self, at: DateTime<Utc>) -> StoreResult<()>;

    /// Insert a flat; its house must exist and its key must be free
    fn create_flat(&self, flat: &Flat) -> StoreResult<()>;

    /// `create_flat` followed by `update_house_flat_time(at)` as one
    /// mutation: either both are applied or neither is.
    fn create_flat_stamped(&self, flat: &Flat, at: DateTime<Utc>) -> StoreResult<()>;

    fn get_flat(&self, key: FlatKey) -> StoreResult<Option<Flat>>;

    fn get_flat_status(&self, key: FlatKey) -> StoreResult<Option<FlatClaim>>;

    /// Overwrite status and claim holder of an existing flat
    fn update_flat(&self, key: FlatKey, status: FlatStatus, moderator: &str) -> StoreResult<()>;

    /// Flats of one house. `role_hint` lets the backend narrow the result
    /// for clients; callers must not rely on it being honoured.
    fn get_flats_by_house_id(&self, house_number: i64, role_hint: Role) -> StoreResult<Vec<Flat>>;
}
