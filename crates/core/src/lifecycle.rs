//! Publication lifecycle evaluator.
//!
//! A content item's visibility is never stored as a single enum. Editors set
//! an explicit status (draft / published / archived) and optionally a publish
//! and unpublish schedule; the *effective* status is derived from those
//! fields relative to the current time by [`effective_status`]. Consolidating
//! the time comparisons here keeps create, update, and the periodic tick from
//! drifting apart.
//!
//! Everything in this module is pure: no clock, no store, no side effects.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Tolerance for schedule timestamps slightly in the past, compensating for
/// clock skew and request latency. Anything older is rejected.
pub const GRACE_WINDOW: chrono::Duration = chrono::Duration::minutes(5);

// ---------------------------------------------------------------------------
// Statuses
// ---------------------------------------------------------------------------

/// Editor-chosen status stored on the record.
///
/// This field is editor intent. The evaluator reads it but never writes it;
/// time-driven transitions are expressed through `published_at` and the
/// notification log, not by rewriting this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExplicitStatus {
    Draft,
    Published,
    Archived,
}

impl ExplicitStatus {
    /// Parse from the database `explicit_status` column.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            "archived" => Ok(Self::Archived),
            other => Err(CoreError::Validation(format!(
                "Unknown explicit status '{other}'. Must be one of: draft, published, archived"
            ))),
        }
    }

    /// The database column value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Archived => "archived",
        }
    }
}

/// Derived publication state, recomputed on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectiveStatus {
    Draft,
    Scheduled,
    Published,
    Archived,
}

impl EffectiveStatus {
    /// Parse a status filter value.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "draft" => Ok(Self::Draft),
            "scheduled" => Ok(Self::Scheduled),
            "published" => Ok(Self::Published),
            "archived" => Ok(Self::Archived),
            other => Err(CoreError::Validation(format!(
                "Unknown status '{other}'. Must be one of: draft, scheduled, published, archived"
            ))),
        }
    }

    /// The serialized name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Scheduled => "scheduled",
            Self::Published => "published",
            Self::Archived => "archived",
        }
    }
}

/// Compute the effective status of a record at `now`.
///
/// Rules, evaluated in order:
/// 1. explicit archival always wins;
/// 2. a passed unpublish time archives regardless of the publish schedule;
/// 3. a future publish time means Scheduled;
/// 4. a passed publish time, or explicit publish with no schedule, means
///    Published;
/// 5. otherwise Draft.
pub fn effective_status(
    explicit: ExplicitStatus,
    scheduled_publish_at: Option<Timestamp>,
    scheduled_unpublish_at: Option<Timestamp>,
    now: Timestamp,
) -> EffectiveStatus {
    if explicit == ExplicitStatus::Archived {
        return EffectiveStatus::Archived;
    }
    if let Some(unpublish_at) = scheduled_unpublish_at {
        if now >= unpublish_at {
            return EffectiveStatus::Archived;
        }
    }
    match scheduled_publish_at {
        Some(publish_at) if now < publish_at => EffectiveStatus::Scheduled,
        Some(_) => EffectiveStatus::Published,
        None if explicit == ExplicitStatus::Published => EffectiveStatus::Published,
        None => EffectiveStatus::Draft,
    }
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// The kind of lifecycle transition, used as the notification type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransitionKind {
    ContentScheduled,
    ContentPublished,
    ContentArchived,
}

impl TransitionKind {
    /// The `transition_type` value persisted with a notification.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ContentScheduled => "content-scheduled",
            Self::ContentPublished => "content-published",
            Self::ContentArchived => "content-archived",
        }
    }
}

/// A detected change of effective status for one record.
///
/// `(content_id, kind, transition_at)` is the idempotency key: both the
/// synchronous evaluator pass and the periodic tick derive the same tuple
/// for the same transition, so duplicate side effects collapse in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionEvent {
    pub content_id: DbId,
    pub kind: TransitionKind,
    pub transition_at: Timestamp,
}

/// Map a status change to the transition it represents, if any.
///
/// Returns at most one kind per call and `None` when the statuses are equal.
/// A move back to Draft (e.g. an editor unscheduling an item) is a valid
/// status change but carries no notification type.
pub fn transition_kind(
    previous: EffectiveStatus,
    next: EffectiveStatus,
) -> Option<TransitionKind> {
    if previous == next {
        return None;
    }
    match next {
        EffectiveStatus::Scheduled => Some(TransitionKind::ContentScheduled),
        EffectiveStatus::Published => Some(TransitionKind::ContentPublished),
        EffectiveStatus::Archived => Some(TransitionKind::ContentArchived),
        EffectiveStatus::Draft => None,
    }
}

// ---------------------------------------------------------------------------
// Schedule validation
// ---------------------------------------------------------------------------

/// Validate a publish / unpublish schedule against `now`.
///
/// - `scheduled_publish_at` may be up to [`GRACE_WINDOW`] in the past;
///   anything older is rejected.
/// - `scheduled_unpublish_at` must be strictly after `scheduled_publish_at`
///   when both are set, and is held to the same grace rule.
pub fn validate_schedule(
    scheduled_publish_at: Option<Timestamp>,
    scheduled_unpublish_at: Option<Timestamp>,
    now: Timestamp,
) -> Result<(), CoreError> {
    let oldest_accepted = now - GRACE_WINDOW;

    if let Some(publish_at) = scheduled_publish_at {
        if publish_at < oldest_accepted {
            return Err(CoreError::Validation(format!(
                "scheduled_publish_at is more than {} minutes in the past",
                GRACE_WINDOW.num_minutes()
            )));
        }
    }

    if let Some(unpublish_at) = scheduled_unpublish_at {
        if let Some(publish_at) = scheduled_publish_at {
            if unpublish_at <= publish_at {
                return Err(CoreError::Validation(
                    "scheduled_unpublish_at must be after scheduled_publish_at".into(),
                ));
            }
        }
        if unpublish_at < oldest_accepted {
            return Err(CoreError::Validation(format!(
                "scheduled_unpublish_at is more than {} minutes in the past",
                GRACE_WINDOW.num_minutes()
            )));
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2025, 9, 1, 12, 0, 0).unwrap()
    }

    // -----------------------------------------------------------------------
    // effective_status rule order
    // -----------------------------------------------------------------------

    #[test]
    fn explicit_archived_wins_over_schedule() {
        let status = effective_status(
            ExplicitStatus::Archived,
            Some(t0() - Duration::hours(1)),
            None,
            t0(),
        );
        assert_eq!(status, EffectiveStatus::Archived);
    }

    #[test]
    fn passed_unpublish_archives_even_with_past_publish() {
        let status = effective_status(
            ExplicitStatus::Published,
            Some(t0() - Duration::hours(2)),
            Some(t0() - Duration::hours(1)),
            t0(),
        );
        assert_eq!(status, EffectiveStatus::Archived);
    }

    #[test]
    fn unpublish_boundary_is_inclusive() {
        let status = effective_status(ExplicitStatus::Published, None, Some(t0()), t0());
        assert_eq!(status, EffectiveStatus::Archived);
    }

    #[test]
    fn future_publish_means_scheduled() {
        let status = effective_status(
            ExplicitStatus::Draft,
            Some(t0() + Duration::hours(1)),
            None,
            t0(),
        );
        assert_eq!(status, EffectiveStatus::Scheduled);
    }

    #[test]
    fn passed_publish_means_published() {
        let status = effective_status(
            ExplicitStatus::Draft,
            Some(t0() - Duration::seconds(1)),
            None,
            t0(),
        );
        assert_eq!(status, EffectiveStatus::Published);
    }

    #[test]
    fn publish_boundary_is_inclusive() {
        let status = effective_status(ExplicitStatus::Draft, Some(t0()), None, t0());
        assert_eq!(status, EffectiveStatus::Published);
    }

    #[test]
    fn explicit_published_without_schedule_is_published() {
        let status = effective_status(ExplicitStatus::Published, None, None, t0());
        assert_eq!(status, EffectiveStatus::Published);
    }

    #[test]
    fn draft_without_schedule_is_draft() {
        let status = effective_status(ExplicitStatus::Draft, None, None, t0());
        assert_eq!(status, EffectiveStatus::Draft);
    }

    #[test]
    fn future_unpublish_does_not_archive() {
        let status = effective_status(
            ExplicitStatus::Published,
            None,
            Some(t0() + Duration::hours(1)),
            t0(),
        );
        assert_eq!(status, EffectiveStatus::Published);
    }

    // -----------------------------------------------------------------------
    // transition_kind
    // -----------------------------------------------------------------------

    #[test]
    fn equal_statuses_yield_no_transition() {
        assert_eq!(
            transition_kind(EffectiveStatus::Published, EffectiveStatus::Published),
            None
        );
    }

    #[test]
    fn scheduled_to_published() {
        assert_eq!(
            transition_kind(EffectiveStatus::Scheduled, EffectiveStatus::Published),
            Some(TransitionKind::ContentPublished)
        );
    }

    #[test]
    fn draft_to_scheduled() {
        assert_eq!(
            transition_kind(EffectiveStatus::Draft, EffectiveStatus::Scheduled),
            Some(TransitionKind::ContentScheduled)
        );
    }

    #[test]
    fn published_to_archived() {
        assert_eq!(
            transition_kind(EffectiveStatus::Published, EffectiveStatus::Archived),
            Some(TransitionKind::ContentArchived)
        );
    }

    #[test]
    fn scheduled_back_to_draft_has_no_notification() {
        assert_eq!(
            transition_kind(EffectiveStatus::Scheduled, EffectiveStatus::Draft),
            None
        );
    }

    // -----------------------------------------------------------------------
    // validate_schedule
    // -----------------------------------------------------------------------

    #[test]
    fn publish_within_grace_window_accepted() {
        assert!(validate_schedule(Some(t0() - Duration::minutes(4)), None, t0()).is_ok());
    }

    #[test]
    fn publish_beyond_grace_window_rejected() {
        let err = validate_schedule(Some(t0() - Duration::minutes(10)), None, t0()).unwrap_err();
        assert!(err.to_string().contains("scheduled_publish_at"));
    }

    #[test]
    fn unpublish_before_publish_rejected() {
        let err = validate_schedule(
            Some(t0() + Duration::hours(2)),
            Some(t0() + Duration::hours(1)),
            t0(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("must be after"));
    }

    #[test]
    fn unpublish_equal_to_publish_rejected() {
        let when = t0() + Duration::hours(1);
        assert!(validate_schedule(Some(when), Some(when), t0()).is_err());
    }

    #[test]
    fn unpublish_beyond_grace_window_rejected() {
        let err = validate_schedule(None, Some(t0() - Duration::minutes(10)), t0()).unwrap_err();
        assert!(err.to_string().contains("scheduled_unpublish_at"));
    }

    #[test]
    fn empty_schedule_is_valid() {
        assert!(validate_schedule(None, None, t0()).is_ok());
    }

    // -----------------------------------------------------------------------
    // Status parsing
    // -----------------------------------------------------------------------

    #[test]
    fn explicit_status_round_trips_names() {
        for status in [
            ExplicitStatus::Draft,
            ExplicitStatus::Published,
            ExplicitStatus::Archived,
        ] {
            assert_eq!(ExplicitStatus::from_name(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn unknown_explicit_status_rejected() {
        assert!(ExplicitStatus::from_name("live").is_err());
    }
}
