//! Repository for the `content_items` table.

use sqlx::PgPool;

use scms_core::types::{DbId, Timestamp};

use crate::models::content::{ContentItem, ContentKind, CreateContent, UpdateContent};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, kind, title, body, attachment_path, explicit_status, \
     scheduled_publish_at, scheduled_unpublish_at, published_at, deleted_at, \
     created_at, updated_at";

/// Provides CRUD and lifecycle primitives for content items.
pub struct ContentRepo;

impl ContentRepo {
    // ── CRUD ──────────────────────────────────────────────────────────

    /// Insert a new content item, returning the created row.
    ///
    /// If `explicit_status` is `None` in the input, defaults to draft.
    pub async fn create(pool: &PgPool, input: &CreateContent) -> Result<ContentItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO content_items \
                (kind, title, body, attachment_path, explicit_status, \
                 scheduled_publish_at, scheduled_unpublish_at) \
             VALUES ($1, $2, $3, $4, COALESCE($5, 'draft'), $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContentItem>(&query)
            .bind(input.kind.as_str())
            .bind(&input.title)
            .bind(&input.body)
            .bind(&input.attachment_path)
            .bind(input.explicit_status.map(|s| s.as_str()))
            .bind(input.scheduled_publish_at)
            .bind(input.scheduled_unpublish_at)
            .fetch_one(pool)
            .await
    }

    /// Find a content item by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ContentItem>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM content_items WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, ContentItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a content item by ID, including soft-deleted rows. Used by the
    /// trash restore/purge flow.
    pub async fn find_by_id_include_deleted(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ContentItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM content_items WHERE id = $1");
        sqlx::query_as::<_, ContentItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List live content, newest first, optionally filtered by kind.
    /// Excludes soft-deleted rows.
    pub async fn list(
        pool: &PgPool,
        kind: Option<ContentKind>,
    ) -> Result<Vec<ContentItem>, sqlx::Error> {
        let query = match kind {
            Some(_) => format!(
                "SELECT {COLUMNS} FROM content_items \
                 WHERE deleted_at IS NULL AND kind = $1 \
                 ORDER BY created_at DESC"
            ),
            None => format!(
                "SELECT {COLUMNS} FROM content_items \
                 WHERE deleted_at IS NULL \
                 ORDER BY created_at DESC"
            ),
        };
        let mut q = sqlx::query_as::<_, ContentItem>(&query);
        if let Some(kind) = kind {
            q = q.bind(kind.as_str());
        }
        q.fetch_all(pool).await
    }

    /// Update a content item. Only non-`None` fields in `input` are applied;
    /// `clear_schedule` nulls both schedule columns.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateContent,
    ) -> Result<Option<ContentItem>, sqlx::Error> {
        let query = format!(
            "UPDATE content_items SET
                title = COALESCE($2, title),
                body = COALESCE($3, body),
                attachment_path = COALESCE($4, attachment_path),
                explicit_status = COALESCE($5, explicit_status),
                scheduled_publish_at =
                    CASE WHEN $8 THEN NULL ELSE COALESCE($6, scheduled_publish_at) END,
                scheduled_unpublish_at =
                    CASE WHEN $8 THEN NULL ELSE COALESCE($7, scheduled_unpublish_at) END,
                updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContentItem>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.body)
            .bind(&input.attachment_path)
            .bind(input.explicit_status.map(|s| s.as_str()))
            .bind(input.scheduled_publish_at)
            .bind(input.scheduled_unpublish_at)
            .bind(input.clear_schedule)
            .fetch_optional(pool)
            .await
    }

    // ── Lifecycle commit ──────────────────────────────────────────────

    /// Atomically record the first publication of a content item.
    ///
    /// Single-statement check-and-set: the update only applies while
    /// `published_at` is still NULL, so of two racing evaluator passes
    /// exactly one observes `true` and owns the transition's side effects.
    /// `published_at` is never reset by later edits.
    pub async fn mark_published(
        pool: &PgPool,
        id: DbId,
        published_at: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE content_items \
             SET published_at = $2, updated_at = NOW() \
             WHERE id = $1 AND published_at IS NULL AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(published_at)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List items whose publish time has passed but which have not yet been
    /// marked published. `published_at IS NULL` is the pending-transition
    /// marker the periodic tick scans for.
    pub async fn list_publish_due(
        pool: &PgPool,
        now: Timestamp,
    ) -> Result<Vec<ContentItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM content_items \
             WHERE deleted_at IS NULL \
               AND published_at IS NULL \
               AND explicit_status <> 'archived' \
               AND scheduled_publish_at IS NOT NULL \
               AND scheduled_publish_at <= $1 \
             ORDER BY scheduled_publish_at"
        );
        sqlx::query_as::<_, ContentItem>(&query)
            .bind(now)
            .fetch_all(pool)
            .await
    }

    /// List items whose unpublish time has passed and whose archive
    /// transition has not yet been dispatched. The notification row keyed at
    /// `scheduled_unpublish_at` is the commit marker for this transition.
    ///
    /// Explicitly archived rows are excluded: such a record was already
    /// Archived before its unpublish time, so the time passing is not a
    /// transition.
    pub async fn list_archive_due(
        pool: &PgPool,
        now: Timestamp,
    ) -> Result<Vec<ContentItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM content_items c \
             WHERE c.deleted_at IS NULL \
               AND c.explicit_status <> 'archived' \
               AND c.scheduled_unpublish_at IS NOT NULL \
               AND c.scheduled_unpublish_at <= $1 \
               AND NOT EXISTS ( \
                   SELECT 1 FROM notifications n \
                   WHERE n.content_id = c.id \
                     AND n.transition_type = 'content-archived' \
                     AND n.transition_at = c.scheduled_unpublish_at) \
             ORDER BY c.scheduled_unpublish_at"
        );
        sqlx::query_as::<_, ContentItem>(&query)
            .bind(now)
            .fetch_all(pool)
            .await
    }

    // ── Trash ─────────────────────────────────────────────────────────

    /// Soft-delete a content item. Returns `true` if a row was marked
    /// deleted; a second call on the same row returns `false`.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE content_items SET deleted_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Restore a soft-deleted content item. Returns `true` if a row was
    /// restored.
    pub async fn restore(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE content_items SET deleted_at = NULL, updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NOT NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List soft-deleted items, most recently deleted first.
    pub async fn list_trashed(pool: &PgPool) -> Result<Vec<ContentItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM content_items \
             WHERE deleted_at IS NOT NULL \
             ORDER BY deleted_at DESC"
        );
        sqlx::query_as::<_, ContentItem>(&query).fetch_all(pool).await
    }

    /// Permanently delete a soft-deleted content item. Returns `true` if a
    /// row was removed, `false` if no matching soft-deleted row exists.
    pub async fn purge(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM content_items WHERE id = $1 AND deleted_at IS NOT NULL")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
