//! Lifecycle transition commit and the periodic tick.
//!
//! The evaluator runs on two occasions: synchronously after an editor
//! mutation and on the periodic tick. Both paths race on the same record, so
//! every commit goes through a single-statement check-and-set:
//!
//! - publish: `published_at` is set while still NULL
//!   ([`ContentRepo::mark_published`]); the winner dispatches the
//!   notification.
//! - archive: the notification insert keyed at `scheduled_unpublish_at` is
//!   itself the marker; the loser hits the unique index and does nothing.
//!
//! Editor-driven archival (explicit status set to archived) is detected by
//! the caller via [`transition_kind`] against the pre-mutation status and
//! dispatched through [`Self::commit_editor_transition`].

use scms_core::error::CoreError;
use scms_core::lifecycle::{
    effective_status, transition_kind, EffectiveStatus, TransitionEvent, TransitionKind,
};
use scms_core::types::Timestamp;
use scms_db::models::content::ContentItem;
use scms_db::repositories::ContentRepo;
use scms_db::DbPool;

use crate::dispatcher::NotificationDispatcher;

/// Commits lifecycle transitions and runs the periodic tick.
pub struct LifecycleService;

impl LifecycleService {
    /// Compute the effective status of `record` at `now`.
    pub fn effective(record: &ContentItem, now: Timestamp) -> Result<EffectiveStatus, CoreError> {
        Ok(effective_status(
            record.explicit_status()?,
            record.scheduled_publish_at,
            record.scheduled_unpublish_at,
            now,
        ))
    }

    /// Commit any time-driven transition pending on `record` at `now`.
    ///
    /// Returns the committed event, or `None` when the record needs no
    /// transition or another evaluator pass already owns it.
    pub async fn process_record(
        pool: &DbPool,
        record: &ContentItem,
        now: Timestamp,
    ) -> Result<Option<TransitionEvent>, CoreError> {
        match Self::effective(record, now)? {
            EffectiveStatus::Published if record.published_at.is_none() => {
                // Deterministic transition timestamp: the schedule time when
                // one exists, so both racing paths derive the same tuple.
                let transition_at = record.scheduled_publish_at.unwrap_or(now);
                let won = ContentRepo::mark_published(pool, record.id, transition_at)
                    .await
                    .map_err(storage_fault)?;
                if !won {
                    return Ok(None);
                }
                let event = TransitionEvent {
                    content_id: record.id,
                    kind: TransitionKind::ContentPublished,
                    transition_at,
                };
                NotificationDispatcher::dispatch_or_warn(pool, &event, record).await;
                Ok(Some(event))
            }
            EffectiveStatus::Archived => {
                // Only time-driven archival is committed here; explicit
                // archival goes through commit_editor_transition.
                let Some(unpublish_at) = record.scheduled_unpublish_at else {
                    return Ok(None);
                };
                if now < unpublish_at {
                    return Ok(None);
                }
                let event = TransitionEvent {
                    content_id: record.id,
                    kind: TransitionKind::ContentArchived,
                    transition_at: unpublish_at,
                };
                // The idempotent insert is the commit marker for archival.
                let created = NotificationDispatcher::dispatch(pool, &event, record).await?;
                Ok(created.map(|_| event))
            }
            _ => Ok(None),
        }
    }

    /// Dispatch the notification for an editor-driven status change.
    ///
    /// `previous` is the effective status computed from the record *before*
    /// the mutation. Publish transitions are routed through the same
    /// check-and-set as the periodic path; scheduled/archived transitions
    /// dispatch directly, keyed at a deterministic timestamp.
    pub async fn commit_editor_transition(
        pool: &DbPool,
        record: &ContentItem,
        previous: EffectiveStatus,
        now: Timestamp,
    ) -> Result<Option<TransitionEvent>, CoreError> {
        let next = Self::effective(record, now)?;
        let Some(kind) = transition_kind(previous, next) else {
            return Ok(None);
        };

        match kind {
            TransitionKind::ContentPublished => Self::process_record(pool, record, now).await,
            TransitionKind::ContentScheduled => {
                // Only a transition *into* Scheduled notifies; rescheduling
                // an already-scheduled item is not a status change.
                let Some(publish_at) = record.scheduled_publish_at else {
                    return Ok(None);
                };
                let event = TransitionEvent {
                    content_id: record.id,
                    kind,
                    transition_at: publish_at,
                };
                let created = NotificationDispatcher::dispatch(pool, &event, record).await?;
                Ok(created.map(|_| event))
            }
            TransitionKind::ContentArchived => {
                let transition_at = match record.scheduled_unpublish_at {
                    Some(unpublish_at) if now >= unpublish_at => unpublish_at,
                    _ => now,
                };
                let event = TransitionEvent {
                    content_id: record.id,
                    kind,
                    transition_at,
                };
                let created = NotificationDispatcher::dispatch(pool, &event, record).await?;
                Ok(created.map(|_| event))
            }
        }
    }

    /// Run one lifecycle tick at `now`, promoting all purely time-triggered
    /// transitions (Scheduled -> Published, Published -> Archived).
    ///
    /// A record that fails to commit is logged and left for the next tick;
    /// one bad row never aborts the pass.
    pub async fn run_lifecycle_tick(
        pool: &DbPool,
        now: Timestamp,
    ) -> Result<Vec<TransitionEvent>, CoreError> {
        let mut committed = Vec::new();

        let publish_due = ContentRepo::list_publish_due(pool, now)
            .await
            .map_err(storage_fault)?;
        for record in &publish_due {
            match Self::process_record(pool, record, now).await {
                Ok(Some(event)) => committed.push(event),
                Ok(None) => {}
                Err(e) => {
                    tracing::error!(
                        content_id = record.id,
                        error = %e,
                        "Lifecycle tick: publish commit failed, will retry next tick"
                    );
                }
            }
        }

        let archive_due = ContentRepo::list_archive_due(pool, now)
            .await
            .map_err(storage_fault)?;
        for record in &archive_due {
            match Self::process_record(pool, record, now).await {
                Ok(Some(event)) => committed.push(event),
                Ok(None) => {}
                Err(e) => {
                    tracing::error!(
                        content_id = record.id,
                        error = %e,
                        "Lifecycle tick: archive commit failed, will retry next tick"
                    );
                }
            }
        }

        if !committed.is_empty() {
            tracing::info!(count = committed.len(), "Lifecycle tick committed transitions");
        }

        Ok(committed)
    }
}

/// Map a repository error onto the domain taxonomy.
fn storage_fault(e: sqlx::Error) -> CoreError {
    CoreError::Internal(format!("storage fault: {e}"))
}
