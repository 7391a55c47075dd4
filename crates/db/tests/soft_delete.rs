//! Integration tests for soft-delete, restore, and purge behaviour.
//!
//! Exercises the repository layer against a real database to verify that:
//! - Soft-deleted content is hidden from `find_by_id` and list queries
//! - Restoring a soft-deleted item makes it visible again
//! - Purge permanently removes a record, but only from the trash
//! - Soft-delete is idempotent (second call returns `false`)

use sqlx::PgPool;

use scms_db::models::content::{ContentKind, CreateContent};
use scms_db::repositories::ContentRepo;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_announcement(title: &str) -> CreateContent {
    CreateContent {
        kind: ContentKind::Announcement,
        title: title.to_string(),
        body: "soft delete test".to_string(),
        attachment_path: None,
        explicit_status: None,
        scheduled_publish_at: None,
        scheduled_unpublish_at: None,
    }
}

// ---------------------------------------------------------------------------
// Test: soft_delete hides entity from find_by_id
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_soft_delete_hides_from_find_by_id(pool: PgPool) {
    let item = ContentRepo::create(&pool, &new_announcement("Hidden Announcement"))
        .await
        .unwrap();

    let deleted = ContentRepo::soft_delete(&pool, item.id).await.unwrap();
    assert!(deleted, "soft_delete should return true on first call");

    let found = ContentRepo::find_by_id(&pool, item.id).await.unwrap();
    assert!(
        found.is_none(),
        "find_by_id should return None for soft-deleted content"
    );
}

// ---------------------------------------------------------------------------
// Test: soft_delete hides entity from list
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_soft_delete_hides_from_list(pool: PgPool) {
    let item = ContentRepo::create(&pool, &new_announcement("Listed Then Deleted"))
        .await
        .unwrap();

    // Verify it shows up in list before deletion.
    let before = ContentRepo::list(&pool, None).await.unwrap();
    assert!(
        before.iter().any(|c| c.id == item.id),
        "content should appear in list before soft delete"
    );

    ContentRepo::soft_delete(&pool, item.id).await.unwrap();

    let after = ContentRepo::list(&pool, None).await.unwrap();
    assert!(
        !after.iter().any(|c| c.id == item.id),
        "content should not appear in list after soft delete"
    );
}

// ---------------------------------------------------------------------------
// Test: soft_delete is idempotent
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_soft_delete_second_call_returns_false(pool: PgPool) {
    let item = ContentRepo::create(&pool, &new_announcement("Twice Deleted"))
        .await
        .unwrap();

    assert!(ContentRepo::soft_delete(&pool, item.id).await.unwrap());
    assert!(
        !ContentRepo::soft_delete(&pool, item.id).await.unwrap(),
        "second soft_delete should return false"
    );

    // Still exactly one trashed row.
    let trashed = ContentRepo::list_trashed(&pool).await.unwrap();
    assert_eq!(trashed.iter().filter(|c| c.id == item.id).count(), 1);
}

// ---------------------------------------------------------------------------
// Test: restore makes a trashed item visible again
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_restore_round_trip(pool: PgPool) {
    let item = ContentRepo::create(&pool, &new_announcement("Restored"))
        .await
        .unwrap();

    ContentRepo::soft_delete(&pool, item.id).await.unwrap();
    assert!(ContentRepo::restore(&pool, item.id).await.unwrap());

    let found = ContentRepo::find_by_id(&pool, item.id).await.unwrap();
    assert!(found.is_some(), "restored content should be visible again");
    assert!(found.unwrap().deleted_at.is_none());
}

// ---------------------------------------------------------------------------
// Test: restore of a live item returns false
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_restore_of_live_item_returns_false(pool: PgPool) {
    let item = ContentRepo::create(&pool, &new_announcement("Never Deleted"))
        .await
        .unwrap();

    assert!(
        !ContentRepo::restore(&pool, item.id).await.unwrap(),
        "restore should return false when the item is not trashed"
    );
}

// ---------------------------------------------------------------------------
// Test: purge only removes trashed rows
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_purge_requires_trashed_row(pool: PgPool) {
    let item = ContentRepo::create(&pool, &new_announcement("Purged"))
        .await
        .unwrap();

    // Live rows are not purgeable.
    assert!(!ContentRepo::purge(&pool, item.id).await.unwrap());

    ContentRepo::soft_delete(&pool, item.id).await.unwrap();
    assert!(ContentRepo::purge(&pool, item.id).await.unwrap());

    // Gone is terminal.
    let found = ContentRepo::find_by_id_include_deleted(&pool, item.id)
        .await
        .unwrap();
    assert!(found.is_none(), "purged row should no longer exist");
    assert!(!ContentRepo::restore(&pool, item.id).await.unwrap());
}

// ---------------------------------------------------------------------------
// Test: trash listing is ordered by deletion time, newest first
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_trashed_contains_deleted_items(pool: PgPool) {
    let first = ContentRepo::create(&pool, &new_announcement("First"))
        .await
        .unwrap();
    let second = ContentRepo::create(&pool, &new_announcement("Second"))
        .await
        .unwrap();

    ContentRepo::soft_delete(&pool, first.id).await.unwrap();
    ContentRepo::soft_delete(&pool, second.id).await.unwrap();

    let trashed = ContentRepo::list_trashed(&pool).await.unwrap();
    assert!(trashed.iter().any(|c| c.id == first.id));
    assert!(trashed.iter().any(|c| c.id == second.id));
    assert!(trashed.iter().all(|c| c.deleted_at.is_some()));
}
