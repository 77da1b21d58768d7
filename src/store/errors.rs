//! # Store Errors

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence failures.
///
/// Absent keys on reads are not errors; reads return `None` or an empty list.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Insert collided with an existing unique key
    #[error("{0} already exists")]
    Duplicate(String),

    /// Insert references a parent record that does not exist
    #[error("{0} not found")]
    MissingParent(String),

    /// Update targeted a record that does not exist
    #[error("{0} not found")]
    MissingRecord(String),

    /// A lock guarding the store was poisoned by a panicking writer
    #[error("Store lock poisoned")]
    LockPoisoned,

    /// Snapshot file could not be read or written
    #[error("Snapshot I/O error: {0}")]
    Io(String),

    /// Snapshot file failed its integrity check
    #[error("Snapshot corrupted: {0}")]
    Corrupted(String),
}
