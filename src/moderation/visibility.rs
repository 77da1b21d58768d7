//! # Visibility Filter
//!
//! Moderators see every flat of a house; clients see approved flats only.
//! No field-level redaction is applied: clients see price and claim holder
//! of the flats they are allowed to see.

use crate::auth::Role;
use crate::store::{Flat, FlatStatus};

pub fn is_visible(flat: &Flat, role: Role) -> bool {
    match role {
        Role::Moderator => true,
        Role::Client => flat.status == FlatStatus::Approved,
    }
}

/// Drop every flat `role` may not see, keeping order
pub fn filter_visible(flats: Vec<Flat>, role: Role) -> Vec<Flat> {
    flats.into_iter().filter(|flat| is_visible(flat, role)).collect()
}
