//! # File-Backed Store
//!
//! Keeps the full state in memory and rewrites a JSON snapshot after
//! every mutation.
//!
//! Snapshot layout:
//! ```text
//! {"checksum": <crc32 of serialized state>, "state": {...}}
//! ```
//!
//! A mutation is applied to a copy of the state; the copy replaces the
//! live state only after the snapshot has been written and renamed into
//! place. A failed write therefore leaves both the file and the live
//! state untouched.
//!
//! The snapshot is written to `<file>.tmp`, synced, renamed over the
//! live file, and then the parent directory is synced so the rename
//! itself is durable.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard};

use chrono::{DateTime, Utc};
use crc32fast::Hasher;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::errors::{StoreError, StoreResult};
use super::models::{Flat, FlatClaim, FlatKey, FlatStatus, House, User};
use super::state::StoreState;
use super::Database;
use crate::auth::Role;

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    checksum: u32,
    state: StoreState,
}

fn compute_checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

fn state_checksum(state: &StoreState) -> StoreResult<u32> {
    let bytes = serde_json::to_vec(state).map_err(|e| StoreError::Io(e.to_string()))?;
    Ok(compute_checksum(&bytes))
}

/// Temp file next to `path`: the full file name plus `.tmp`
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Directory holding `path`; `.` for a bare file name
fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn fsync_dir(dir: &Path) -> std::io::Result<()> {
    File::open(dir)?.sync_all()
}

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    state: RwLock<StoreState>,
}

impl FileStore {
    /// Open the snapshot at `path`, starting empty when the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let state = if path.exists() {
            Self::load(&path)?
        } else {
            StoreState::new()
        };

        Ok(Self {
            path,
            state: RwLock::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> StoreResult<StoreState> {
        let content = fs::read(path)
            .map_err(|e| StoreError::Io(format!("{}: {}", path.display(), e)))?;

        let snapshot: Snapshot = serde_json::from_slice(&content)
            .map_err(|e| StoreError::Corrupted(format!("{}: {}", path.display(), e)))?;

        let actual = state_checksum(&snapshot.state)?;
        if actual != snapshot.checksum {
            return Err(StoreError::Corrupted(format!(
                "{}: checksum mismatch (expected {:08x}, found {:08x})",
                path.display(),
                snapshot.checksum,
                actual
            )));
        }

        Ok(snapshot.state)
    }

    fn persist(&self, state: &StoreState) -> StoreResult<()> {
        let snapshot = Snapshot {
            checksum: state_checksum(state)?,
            state: state.clone(),
        };
        let bytes = serde_json::to_vec(&snapshot).map_err(|e| StoreError::Io(e.to_string()))?;

        let tmp_path = temp_path(&self.path);
        let io_err = |e: std::io::Error| StoreError::Io(format!("{}: {}", tmp_path.display(), e));

        let mut file = File::create(&tmp_path).map_err(io_err)?;
        file.write_all(&bytes).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;

        fs::rename(&tmp_path, &self.path)
            .map_err(|e| StoreError::Io(format!("{}: {}", self.path.display(), e)))?;

        // Snapshot is already in place; a failed directory sync is logged, not returned.
        let dir = parent_dir(&self.path);
        if let Err(e) = fsync_dir(dir) {
            warn!(dir = %dir.display(), error = %e, "snapshot directory sync failed");
        }

        Ok(())
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, StoreState>> {
        self.state.read().map_err(|_| StoreError::LockPoisoned)
    }

    fn mutate<T>(&self, f: impl FnOnce(&mut StoreState) -> StoreResult<T>) -> StoreResult<T> {
        let mut live = self.state.write().map_err(|_| StoreError::LockPoisoned)?;

        let mut next = live.clone();
        let out = f(&mut next)?;
        self.persist(&next)?;
        *live = next;

        Ok(out)
    }
}

impl Database for FileStore {
    fn create_user(&self, user: &User) -> StoreResult<()> {
        self.mutate(|state| state.insert_user(user))
    }

    fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.read()?.user_by_email(email))
    }

    fn create_house(&self, house: &House) -> StoreResult<()> {
        self.mutate(|state| state.insert_house(house))
    }

    fn get_house_by_id(&self, house_number: i64) -> StoreResult<Option<House>> {
        Ok(self.read()?.house(house_number))
    }

    fn update_house_flat_time(&self, at: DateTime<Utc>) -> StoreResult<()> {
        self.mutate(|state| {
            state.touch_flat_time(at);
            Ok(())
        })
    }

    fn create_flat(&self, flat: &Flat) -> StoreResult<()> {
        self.mutate(|state| state.insert_flat(flat))
    }

    fn create_flat_stamped(&self, flat: &Flat, at: DateTime<Utc>) -> StoreResult<()> {
        self.mutate(|state| state.insert_flat_stamped(flat, at))
    }

    fn get_flat(&self, key: FlatKey) -> StoreResult<Option<Flat>> {
        Ok(self.read()?.flat(key).cloned())
    }

    fn get_flat_status(&self, key: FlatKey) -> StoreResult<Option<FlatClaim>> {
        Ok(self.read()?.flat_claim(key))
    }

    fn update_flat(&self, key: FlatKey, status: FlatStatus, moderator: &str) -> StoreResult<()> {
        self.mutate(|state| state.set_flat_status(key, status, moderator))
    }

    fn get_flats_by_house_id(&self, house_number: i64, role_hint: Role) -> StoreResult<Vec<Flat>> {
        Ok(self.read()?.flats_in_house(house_number, role_hint))
    }
}
