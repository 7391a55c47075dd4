//! Trash state machine.
//!
//! Records move Live -> Trashed via soft delete, back to Live via restore,
//! or from Trashed to Gone via purge. Gone is terminal and purge of a live
//! record is rejected as a guard against accidental permanent loss.

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Where a record sits in the trash lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrashState {
    /// Visible to default queries; `deleted_at` is NULL.
    Live,
    /// Soft-deleted; excluded from default queries, listed in the trash.
    Trashed,
    /// Permanently removed. Terminal.
    Gone,
}

impl TrashState {
    /// Derive the state from a record's `deleted_at` column. A row that no
    /// longer exists is Gone.
    pub fn from_deleted_at(deleted_at: Option<Timestamp>) -> Self {
        match deleted_at {
            Some(_) => Self::Trashed,
            None => Self::Live,
        }
    }
}

/// Returns the set of states reachable from `from`.
pub fn valid_transitions(from: TrashState) -> &'static [TrashState] {
    match from {
        TrashState::Live => &[TrashState::Trashed],
        TrashState::Trashed => &[TrashState::Live, TrashState::Gone],
        TrashState::Gone => &[],
    }
}

/// Check whether a transition from `from` to `to` is valid.
pub fn can_transition(from: TrashState, to: TrashState) -> bool {
    valid_transitions(from).contains(&to)
}

/// Guard for restore: the record must currently be trashed.
pub fn require_trashed_for_restore(state: TrashState, id: DbId) -> Result<(), CoreError> {
    if can_transition(state, TrashState::Live) {
        return Ok(());
    }
    Err(CoreError::NotFound {
        entity: "TrashedItem",
        id,
    })
}

/// Guard for purge: purging a live record is rejected outright.
pub fn require_trashed_for_purge(state: TrashState, id: DbId) -> Result<(), CoreError> {
    if can_transition(state, TrashState::Gone) {
        return Ok(());
    }
    match state {
        TrashState::Live => Err(CoreError::Conflict(format!(
            "Content {id} is not in the trash; soft-delete it before purging"
        ))),
        _ => Err(CoreError::NotFound {
            entity: "TrashedItem",
            id,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn live_to_trashed() {
        assert!(can_transition(TrashState::Live, TrashState::Trashed));
    }

    #[test]
    fn trashed_to_live() {
        assert!(can_transition(TrashState::Trashed, TrashState::Live));
    }

    #[test]
    fn trashed_to_gone() {
        assert!(can_transition(TrashState::Trashed, TrashState::Gone));
    }

    #[test]
    fn live_to_gone_invalid() {
        assert!(!can_transition(TrashState::Live, TrashState::Gone));
    }

    #[test]
    fn gone_is_terminal() {
        assert!(valid_transitions(TrashState::Gone).is_empty());
    }

    #[test]
    fn restore_requires_trashed() {
        let err = require_trashed_for_restore(TrashState::Live, 7).unwrap_err();
        assert_matches!(err, crate::error::CoreError::NotFound { id: 7, .. });
    }

    #[test]
    fn purge_of_live_record_is_a_conflict() {
        let err = require_trashed_for_purge(TrashState::Live, 7).unwrap_err();
        assert_matches!(err, crate::error::CoreError::Conflict(_));
    }

    #[test]
    fn purge_of_trashed_record_allowed() {
        assert!(require_trashed_for_purge(TrashState::Trashed, 7).is_ok());
    }

    #[test]
    fn state_from_deleted_at() {
        assert_eq!(TrashState::from_deleted_at(None), TrashState::Live);
        assert_eq!(
            TrashState::from_deleted_at(Some(chrono::Utc::now())),
            TrashState::Trashed
        );
    }
}
