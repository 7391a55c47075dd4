//! Repository for the `notifications` table.

use sqlx::PgPool;

use scms_core::types::DbId;

use crate::models::notification::{CreateNotification, Notification};

/// Column list for `notifications` queries.
const COLUMNS: &str = "id, content_id, transition_type, title, message, payload, \
     transition_at, is_read, read_at, created_at";

/// Provides CRUD operations for notifications.
pub struct NotificationRepo;

impl NotificationRepo {
    /// Insert a notification, idempotently.
    ///
    /// The unique index on `(content_id, transition_type, transition_at)`
    /// makes the insert a single-statement check-and-set: the first caller
    /// gets the created row back, any concurrent or repeated dispatch of the
    /// same transition hits the conflict and gets `None`.
    pub async fn insert(
        pool: &PgPool,
        input: &CreateNotification,
    ) -> Result<Option<Notification>, sqlx::Error> {
        let query = format!(
            "INSERT INTO notifications \
                (content_id, transition_type, title, message, payload, transition_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (content_id, transition_type, transition_at) DO NOTHING \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(input.content_id)
            .bind(&input.transition_type)
            .bind(&input.title)
            .bind(&input.message)
            .bind(&input.payload)
            .bind(input.transition_at)
            .fetch_optional(pool)
            .await
    }

    /// List notifications, newest first.
    ///
    /// When `unread_only` is `true`, only notifications with `is_read = false`
    /// are returned.
    pub async fn list(
        pool: &PgPool,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let filter = if unread_only {
            "WHERE is_read = false"
        } else {
            ""
        };
        let query = format!(
            "SELECT {COLUMNS} FROM notifications {filter} \
             ORDER BY created_at DESC \
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Mark a single notification as read.
    ///
    /// Returns `true` if an unread notification was found and updated,
    /// `false` otherwise.
    pub async fn mark_read(pool: &PgPool, notification_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications \
             SET is_read = true, read_at = NOW() \
             WHERE id = $1 AND is_read = false",
        )
        .bind(notification_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark all unread notifications as read.
    ///
    /// Returns the number of notifications that were marked read.
    pub async fn mark_all_read(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications \
             SET is_read = true, read_at = NOW() \
             WHERE is_read = false",
        )
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Get the number of unread notifications.
    pub async fn unread_count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let count: Option<i64> =
            sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE is_read = false")
                .fetch_one(pool)
                .await?;
        Ok(count.unwrap_or(0))
    }

    /// Count notifications of a given type for one content item.
    pub async fn count_for_content(
        pool: &PgPool,
        content_id: DbId,
        transition_type: &str,
    ) -> Result<i64, sqlx::Error> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications \
             WHERE content_id = $1 AND transition_type = $2",
        )
        .bind(content_id)
        .bind(transition_type)
        .fetch_one(pool)
        .await?;
        Ok(count.unwrap_or(0))
    }
}
