//! # Write Gate
//!
//! The single serialization point for every mutating operation
//! (registration, login, house and flat creation, flat transitions).
//! At most one closure passed to [`WriteGate::run`] executes at a time,
//! across all houses and flats.
//!
//! The gate is owned by the service instance, not a process static.

use std::sync::Mutex;

use super::errors::{ModerationError, ModerationResult};
use crate::store::StoreError;

#[derive(Debug, Default)]
pub struct WriteGate {
    lock: Mutex<()>,
}

impl WriteGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` with exclusive write access
    pub fn run<T>(&self, f: impl FnOnce() -> ModerationResult<T>) -> ModerationResult<T> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| ModerationError::Storage(StoreError::LockPoisoned))?;
        f()
    }
}
