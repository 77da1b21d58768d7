//! # Flat Moderation State Machine
//!
//! Any status in the fixed set is a legal target from any other status,
//! including moving away from `approved` or `declined`. The only gate is
//! the review claim:
//!
//! - a flat `on moderation` with a non-empty claim can only be moved by
//!   the claim holder;
//! - every successful transition makes the acting moderator the new claim
//!   holder. Claims are never cleared, not even when a flat leaves
//!   `on moderation`.
//!
//! Checks run in a fixed order: the flat must exist (`NotFound`), the
//! requested status must be in the set (`InvalidStatus`), then the claim
//! is checked (`Conflict`). An unknown status on an existing flat is
//! therefore rejected whoever holds the claim.
//!
//! The machine keeps no state of its own. Callers run
//! [`apply_transition`] inside the write gate so the claim check and the
//! update are not interleaved with another writer.

use tracing::{info, warn};

use super::errors::{ModerationError, ModerationResult};
use super::guard::ModeratorId;
use crate::store::{Database, Flat, FlatClaim, FlatKey, FlatStatus};

/// A status change request as received from the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionRequest {
    pub key: FlatKey,
    pub status: String,
}

impl TransitionRequest {
    pub fn new(house_number: i64, flat_number: i64, status: impl Into<String>) -> Self {
        Self {
            key: FlatKey::new(house_number, flat_number),
            status: status.into(),
        }
    }

    /// The requested status, if it is in the fixed set
    pub fn target(&self) -> ModerationResult<FlatStatus> {
        self.status
            .parse::<FlatStatus>()
            .map_err(|e| ModerationError::InvalidStatus(e.0))
    }
}

/// Whether `requester` may move a flat currently in `claim`
pub fn may_transition(claim: &FlatClaim, requester: &ModeratorId) -> bool {
    match claim.status {
        FlatStatus::OnModeration => {
            claim.moderator.is_empty() || claim.moderator == requester.as_str()
        }
        FlatStatus::Created | FlatStatus::Approved | FlatStatus::Declined => true,
    }
}

/// Apply a status change and return the flat as persisted.
pub fn apply_transition(
    store: &dyn Database,
    request: &TransitionRequest,
    requester: &ModeratorId,
) -> ModerationResult<Flat> {
    let key = request.key;

    let claim = store
        .get_flat_status(key)?
        .ok_or_else(|| ModerationError::NotFound(key.to_string()))?;

    let target = request.target()?;

    if !may_transition(&claim, requester) {
        warn!(
            house_number = key.house_number,
            flat_number = key.flat_number,
            requested = %target,
            "flat is claimed by another moderator"
        );
        return Err(ModerationError::Conflict);
    }

    store.update_flat(key, target, requester.as_str())?;

    let flat = store
        .get_flat(key)?
        .ok_or_else(|| ModerationError::NotFound(key.to_string()))?;

    info!(
        house_number = key.house_number,
        flat_number = key.flat_number,
        from = %claim.status,
        to = %flat.status,
        "flat status changed"
    );
    Ok(flat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{House, MemoryStore};
    use chrono::Utc;

    const M1: &str = "moderator-one";
    const M2: &str = "moderator-two";

    fn store_with_flat(status: FlatStatus, moderator: &str) -> MemoryStore {
        let store = MemoryStore::new();
        store
            .create_house(&House {
                house_number: 1,
                address: "Tverskaya 1".to_string(),
                year_built: 2010,
                developer: None,
                created_at: Utc::now(),
                last_flat_added_at: None,
            })
            .unwrap();
        store
            .create_flat(&Flat {
                house_number: 1,
                flat_number: 1,
                price: 100,
                rooms: 2,
                status: FlatStatus::Created,
                moderator: String::new(),
            })
            .unwrap();
        if status != FlatStatus::Created || !moderator.is_empty() {
            store
                .update_flat(FlatKey::new(1, 1), status, moderator)
                .unwrap();
        }
        store
    }

    fn request(status: &str) -> TransitionRequest {
        TransitionRequest::new(1, 1, status)
    }

    #[test]
    fn test_unknown_status_target() {
        for bad in ["", "on_moderation", "Approved", "published"] {
            assert!(matches!(
                request(bad).target(),
                Err(ModerationError::InvalidStatus(s)) if s == bad
            ));
        }
        assert_eq!(request("on moderation").target().unwrap(), FlatStatus::OnModeration);
    }

    #[test]
    fn test_missing_flat_is_not_found() {
        let store = store_with_flat(FlatStatus::Created, "");

        for status in ["approved", "sold"] {
            let req = TransitionRequest::new(1, 99, status);
            assert!(matches!(
                apply_transition(&store, &req, &ModeratorId::new(M1)),
                Err(ModerationError::NotFound(_))
            ));
        }
    }

    #[test]
    fn test_unknown_status_checked_before_claim() {
        let store = store_with_flat(FlatStatus::OnModeration, M1);

        for requester in [M1, M2] {
            assert!(matches!(
                apply_transition(&store, &request("sold"), &ModeratorId::new(requester)),
                Err(ModerationError::InvalidStatus(_))
            ));
        }

        let unchanged = store.get_flat(FlatKey::new(1, 1)).unwrap().unwrap();
        assert_eq!(unchanged.status, FlatStatus::OnModeration);
        assert_eq!(unchanged.moderator, M1);
    }

    #[test]
    fn test_claim_taken_on_moderation() {
        let store = store_with_flat(FlatStatus::Created, "");

        let flat = apply_transition(&store, &request("on moderation"), &ModeratorId::new(M1)).unwrap();
        assert_eq!(flat.status, FlatStatus::OnModeration);
        assert_eq!(flat.moderator, M1);
    }

    #[test]
    fn test_other_moderator_conflicts_while_on_moderation() {
        let store = store_with_flat(FlatStatus::OnModeration, M1);

        for target in ["approved", "declined", "created", "on moderation"] {
            assert!(matches!(
                apply_transition(&store, &request(target), &ModeratorId::new(M2)),
                Err(ModerationError::Conflict)
            ));
        }

        let unchanged = store.get_flat(FlatKey::new(1, 1)).unwrap().unwrap();
        assert_eq!(unchanged.status, FlatStatus::OnModeration);
        assert_eq!(unchanged.moderator, M1);
    }

    #[test]
    fn test_claim_holder_may_finish_review() {
        let store = store_with_flat(FlatStatus::OnModeration, M1);

        let flat = apply_transition(&store, &request("approved"), &ModeratorId::new(M1)).unwrap();
        assert_eq!(flat.status, FlatStatus::Approved);
        assert_eq!(flat.moderator, M1);
    }

    #[test]
    fn test_unclaimed_on_moderation_is_open() {
        let store = store_with_flat(FlatStatus::OnModeration, "");

        let flat = apply_transition(&store, &request("declined"), &ModeratorId::new(M2)).unwrap();
        assert_eq!(flat.status, FlatStatus::Declined);
        assert_eq!(flat.moderator, M2);
    }

    #[test]
    fn test_last_mutator_takes_claim_outside_review() {
        let store = store_with_flat(FlatStatus::Approved, M1);

        let flat = apply_transition(&store, &request("on moderation"), &ModeratorId::new(M2)).unwrap();
        assert_eq!(flat.status, FlatStatus::OnModeration);
        assert_eq!(flat.moderator, M2);

        assert!(matches!(
            apply_transition(&store, &request("approved"), &ModeratorId::new(M1)),
            Err(ModerationError::Conflict)
        ));
    }

    #[test]
    fn test_may_transition_table() {
        let m1 = ModeratorId::new(M1);
        let claim = |status, moderator: &str| FlatClaim {
            status,
            moderator: moderator.to_string(),
        };

        assert!(may_transition(&claim(FlatStatus::OnModeration, M1), &m1));
        assert!(may_transition(&claim(FlatStatus::OnModeration, ""), &m1));
        assert!(!may_transition(&claim(FlatStatus::OnModeration, M2), &m1));
        assert!(may_transition(&claim(FlatStatus::Declined, M2), &m1));
        assert!(may_transition(&claim(FlatStatus::Created, M2), &m1));
    }
}
