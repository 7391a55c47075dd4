//! Notification dispatch for lifecycle transitions.
//!
//! Every detected transition becomes at most one [`Notification`] row. The
//! unique index on `(content_id, transition_type, transition_at)` makes the
//! insert idempotent, so the synchronous evaluator pass and the periodic
//! tick can both dispatch the same transition without creating duplicates.

use scms_core::error::CoreError;
use scms_core::lifecycle::{TransitionEvent, TransitionKind};
use scms_db::models::content::ContentItem;
use scms_db::models::notification::{CreateNotification, Notification};
use scms_db::repositories::NotificationRepo;
use scms_db::DbPool;

/// Persists notifications for lifecycle transitions.
pub struct NotificationDispatcher;

impl NotificationDispatcher {
    /// Persist a notification for `event`, idempotently.
    ///
    /// Returns `Ok(Some(..))` when this call created the notification and
    /// `Ok(None)` when the same transition was already dispatched.
    pub async fn dispatch(
        pool: &DbPool,
        event: &TransitionEvent,
        content: &ContentItem,
    ) -> Result<Option<Notification>, CoreError> {
        let input = build_notification(event, content);
        NotificationRepo::insert(pool, &input)
            .await
            .map_err(|e| CoreError::Internal(format!("notification write failed: {e}")))
    }

    /// Like [`dispatch`](Self::dispatch), but a failed write is logged and
    /// swallowed. Losing a notification must never block the content
    /// transition that triggered it.
    pub async fn dispatch_or_warn(pool: &DbPool, event: &TransitionEvent, content: &ContentItem) {
        match Self::dispatch(pool, event, content).await {
            Ok(Some(notification)) => {
                tracing::info!(
                    content_id = event.content_id,
                    transition = event.kind.as_str(),
                    notification_id = notification.id,
                    "Dispatched lifecycle notification"
                );
            }
            Ok(None) => {
                tracing::debug!(
                    content_id = event.content_id,
                    transition = event.kind.as_str(),
                    "Transition already notified, skipping"
                );
            }
            Err(e) => {
                tracing::warn!(
                    content_id = event.content_id,
                    transition = event.kind.as_str(),
                    error = %e,
                    "Failed to dispatch lifecycle notification"
                );
            }
        }
    }
}

/// Build the human text and payload for a transition notification.
fn build_notification(event: &TransitionEvent, content: &ContentItem) -> CreateNotification {
    let (title, message) = match event.kind {
        TransitionKind::ContentScheduled => (
            "Content scheduled".to_string(),
            format!(
                "{} '{}' is scheduled to publish at {}",
                content.kind, content.title, event.transition_at
            ),
        ),
        TransitionKind::ContentPublished => (
            "Content published".to_string(),
            format!("{} '{}' is now published", content.kind, content.title),
        ),
        TransitionKind::ContentArchived => (
            "Content archived".to_string(),
            format!("{} '{}' has been archived", content.kind, content.title),
        ),
    };

    CreateNotification {
        content_id: event.content_id,
        transition_type: event.kind.as_str().to_string(),
        title,
        message,
        payload: serde_json::json!({
            "content_id": event.content_id,
            "kind": content.kind,
            "title": content.title,
            "transition": event.kind.as_str(),
            "transition_at": event.transition_at,
        }),
        transition_at: event.transition_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample_content() -> ContentItem {
        let now = Utc.with_ymd_and_hms(2025, 9, 1, 12, 0, 0).unwrap();
        ContentItem {
            id: 3,
            kind: "announcement".into(),
            title: "Sports day".into(),
            body: String::new(),
            attachment_path: None,
            explicit_status: "draft".into(),
            scheduled_publish_at: Some(now),
            scheduled_unpublish_at: None,
            published_at: None,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn notification_carries_idempotency_tuple() {
        let content = sample_content();
        let event = TransitionEvent {
            content_id: content.id,
            kind: TransitionKind::ContentPublished,
            transition_at: content.scheduled_publish_at.unwrap(),
        };

        let input = build_notification(&event, &content);
        assert_eq!(input.content_id, 3);
        assert_eq!(input.transition_type, "content-published");
        assert_eq!(input.transition_at, event.transition_at);
        assert!(input.message.contains("Sports day"));
        assert_eq!(input.payload["kind"], "announcement");
    }
}
