//! Handlers for the `/content` resource (announcements and events).
//!
//! Every mutation runs a synchronous evaluator pass so status changes take
//! effect immediately; the periodic tick covers purely time-triggered
//! transitions between mutations. Both paths share the same atomic commit,
//! so running them concurrently is safe.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use scms_core::error::CoreError;
use scms_core::lifecycle::{validate_schedule, EffectiveStatus};
use scms_core::types::{DbId, Timestamp};
use scms_db::models::content::{ContentItem, ContentKind, CreateContent, UpdateContent};
use scms_db::repositories::ContentRepo;
use scms_events::LifecycleService;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Query parameters for the content listing endpoint.
#[derive(Debug, Deserialize)]
pub struct ContentQuery {
    /// Optional kind filter ("announcement" or "event").
    pub kind: Option<String>,
    /// Optional effective-status filter, computed at read time.
    pub status: Option<String>,
}

/// POST /api/v1/content
///
/// Create a content item. The schedule is validated against the current
/// time (5-minute grace window), and the evaluator runs immediately: a
/// future publish time dispatches a scheduled notification, a publish time
/// already in the grace window commits the publish on the spot.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateContent>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let now = state.clock.now();
    validate_schedule(input.scheduled_publish_at, input.scheduled_unpublish_at, now)?;

    let created = ContentRepo::create(&state.pool, &input).await?;

    // A freshly created record starts from Draft for transition purposes.
    // The record is already committed; a failed dispatch is logged and the
    // periodic tick retries it. It never turns the create into an error.
    if let Err(e) =
        LifecycleService::commit_editor_transition(&state.pool, &created, EffectiveStatus::Draft, now)
            .await
    {
        tracing::warn!(
            content_id = created.id,
            error = %e,
            "Lifecycle dispatch failed after create; tick will retry"
        );
    }

    // Re-read so an immediate publish commit is reflected in the response.
    let item = ContentRepo::find_by_id(&state.pool, created.id)
        .await?
        .unwrap_or(created);
    let effective = LifecycleService::effective(&item, now)?;

    Ok((StatusCode::CREATED, Json(content_json(&item, effective)?)))
}

/// GET /api/v1/content
///
/// List live content, optionally filtered by kind and by effective status.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ContentQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let kind = params
        .kind
        .as_deref()
        .map(ContentKind::from_name)
        .transpose()?;
    let status_filter = params
        .status
        .as_deref()
        .map(EffectiveStatus::from_name)
        .transpose()?;

    let now = state.clock.now();
    let items = ContentRepo::list(&state.pool, kind).await?;

    let mut data = Vec::with_capacity(items.len());
    for item in &items {
        let effective = LifecycleService::effective(item, now)?;
        if let Some(wanted) = status_filter {
            if effective != wanted {
                continue;
            }
        }
        data.push(content_json(item, effective)?);
    }

    Ok(Json(serde_json::json!({ "data": data })))
}

/// GET /api/v1/content/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let item = ContentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Content",
            id,
        })?;
    let effective = LifecycleService::effective(&item, state.clock.now())?;
    Ok(Json(content_json(&item, effective)?))
}

/// PATCH /api/v1/content/{id}
///
/// Apply a partial update. Schedule fields are re-validated when the patch
/// touches them; an editor moving the item to archived dispatches the
/// archive notification through the usual idempotent path. Replacing the
/// attachment fires a best-effort delete of the superseded file.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateContent>,
) -> AppResult<Json<serde_json::Value>> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let old = ContentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Content",
            id,
        })?;

    let now = state.clock.now();
    validate_update_schedule(&old, &input, now)?;
    let previous = LifecycleService::effective(&old, now)?;

    let updated = ContentRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Content",
            id,
        })?;

    // As on create: the row is committed, so a failed dispatch is logged
    // rather than failing the update.
    if let Err(e) =
        LifecycleService::commit_editor_transition(&state.pool, &updated, previous, now).await
    {
        tracing::warn!(
            content_id = updated.id,
            error = %e,
            "Lifecycle dispatch failed after update; tick will retry"
        );
    }

    // The old attachment is superseded; its removal is fire-and-forget
    // relative to the record write.
    if let (Some(old_path), Some(new_path)) = (&old.attachment_path, &updated.attachment_path) {
        if old_path != new_path {
            let assets = Arc::clone(&state.assets);
            let path = old_path.clone();
            tokio::spawn(async move {
                assets.remove_or_warn(&path).await;
            });
        }
    }

    let item = ContentRepo::find_by_id(&state.pool, id)
        .await?
        .unwrap_or(updated);
    let effective = LifecycleService::effective(&item, now)?;

    Ok(Json(content_json(&item, effective)?))
}

/// DELETE /api/v1/content/{id}
///
/// Soft-delete a content item. Idempotent: deleting an already-trashed item
/// succeeds without effect.
pub async fn soft_delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ContentRepo::soft_delete(&state.pool, id).await? {
        return Ok(StatusCode::NO_CONTENT);
    }

    // No live row was marked: either already trashed (fine) or missing.
    match ContentRepo::find_by_id_include_deleted(&state.pool, id).await? {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err(AppError::Core(CoreError::NotFound {
            entity: "Content",
            id,
        })),
    }
}

// ── Private helpers ──────────────────────────────────────────────────────

/// Serialize a content item with its derived effective status attached.
fn content_json(
    item: &ContentItem,
    effective: EffectiveStatus,
) -> AppResult<serde_json::Value> {
    let mut value = serde_json::to_value(item)
        .map_err(|e| AppError::InternalError(format!("serialization failed: {e}")))?;
    value["effective_status"] = serde_json::Value::String(effective.as_str().to_string());
    Ok(value)
}

/// Validate the schedule resulting from a partial update.
///
/// Grace-window checks apply only to timestamps the patch supplies; an old
/// publish time that has long passed must not fail validation when the
/// editor merely adjusts the unpublish time. The ordering invariant is
/// checked against the merged schedule.
fn validate_update_schedule(
    old: &ContentItem,
    input: &UpdateContent,
    now: Timestamp,
) -> Result<(), CoreError> {
    if input.clear_schedule {
        return Ok(());
    }
    if input.scheduled_publish_at.is_none() && input.scheduled_unpublish_at.is_none() {
        return Ok(());
    }

    validate_schedule(input.scheduled_publish_at, input.scheduled_unpublish_at, now)?;

    let publish = input.scheduled_publish_at.or(old.scheduled_publish_at);
    let unpublish = input.scheduled_unpublish_at.or(old.scheduled_unpublish_at);
    if let (Some(publish_at), Some(unpublish_at)) = (publish, unpublish) {
        if unpublish_at <= publish_at {
            return Err(CoreError::Validation(
                "scheduled_unpublish_at must be after scheduled_publish_at".into(),
            ));
        }
    }
    Ok(())
}
