//! Handlers for the `/trash` resource.
//!
//! Soft-deleted content is listed here and either restored or purged.
//! Purge is guarded: it only applies to records already in the trash, and it
//! removes the bound attachment (best-effort, idempotent) before the row.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use scms_core::error::CoreError;
use scms_core::trash::{require_trashed_for_purge, require_trashed_for_restore, TrashState};
use scms_core::types::{DbId, Timestamp};
use scms_db::repositories::ContentRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// A single soft-deleted item surfaced in the trash list.
#[derive(Debug, Serialize)]
pub struct TrashedItem {
    pub id: DbId,
    pub kind: String,
    pub title: String,
    pub deleted_at: Option<Timestamp>,
}

/// Summary returned by the trash listing endpoint.
#[derive(Debug, Serialize)]
pub struct TrashSummary {
    pub items: Vec<TrashedItem>,
    pub total_count: i64,
}

/// GET /api/v1/trash
///
/// List all soft-deleted content, most recently deleted first.
pub async fn list_trashed(State(state): State<AppState>) -> AppResult<Json<TrashSummary>> {
    let rows = ContentRepo::list_trashed(&state.pool).await?;
    let items: Vec<TrashedItem> = rows
        .into_iter()
        .map(|row| TrashedItem {
            id: row.id,
            kind: row.kind,
            title: row.title,
            deleted_at: row.deleted_at,
        })
        .collect();
    let total_count = items.len() as i64;
    Ok(Json(TrashSummary { items, total_count }))
}

/// POST /api/v1/trash/{id}/restore
///
/// Restore a soft-deleted content item. Returns 404 if the item is not in
/// the trash.
pub async fn restore(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let record = ContentRepo::find_by_id_include_deleted(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "TrashedItem",
            id,
        })?;

    require_trashed_for_restore(TrashState::from_deleted_at(record.deleted_at), id)?;

    let restored = ContentRepo::restore(&state.pool, id).await?;
    if restored {
        Ok(Json(serde_json::json!({
            "restored": true,
            "id": id,
        })))
    } else {
        // The row left the trash between the guard check and the update.
        Err(AppError::Core(CoreError::NotFound {
            entity: "TrashedItem",
            id,
        }))
    }
}

/// DELETE /api/v1/trash/{id}/purge
///
/// Permanently delete a trashed content item and its bound attachment.
/// Rejected with 409 when the record is still live; the attachment delete
/// is attempted first, is idempotent, and never aborts the purge.
pub async fn purge(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let record = ContentRepo::find_by_id_include_deleted(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "TrashedItem",
            id,
        })?;

    require_trashed_for_purge(TrashState::from_deleted_at(record.deleted_at), id)?;

    if let Some(path) = &record.attachment_path {
        state.assets.remove_or_warn(path).await;
    }

    let purged = ContentRepo::purge(&state.pool, id).await?;
    if purged {
        Ok(StatusCode::NO_CONTENT)
    } else {
        // The row left the trash between the guard check and the delete.
        Err(AppError::Core(CoreError::Conflict(format!(
            "Content {id} is no longer in the trash"
        ))))
    }
}
