//! Notification entity models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use scms_core::types::{DbId, Timestamp};

/// A row from the `notifications` table.
///
/// Created once per detected lifecycle transition and never mutated except
/// for the read flag.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub content_id: DbId,
    pub transition_type: String,
    pub title: String,
    pub message: String,
    pub payload: serde_json::Value,
    pub transition_at: Timestamp,
    pub is_read: bool,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// Insert shape for a notification.
///
/// `(content_id, transition_type, transition_at)` is the idempotency key;
/// inserting a duplicate is a silent no-op at the repository level.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateNotification {
    pub content_id: DbId,
    pub transition_type: String,
    pub title: String,
    pub message: String,
    pub payload: serde_json::Value,
    pub transition_at: Timestamp,
}
