//! Handlers for the `/notifications` resource.
//!
//! Notifications are created by the lifecycle dispatcher; the API surface
//! only reads them and manages the read/unread flag, which is independent of
//! the content lifecycle.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use scms_core::error::CoreError;
use scms_core::types::DbId;
use scms_db::repositories::NotificationRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Query parameters for `GET /notifications`.
#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    /// If `true`, return only unread notifications. Defaults to `false`.
    pub unread_only: Option<bool>,
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}

/// Maximum page size for notification listing.
const MAX_LIMIT: i64 = 100;

/// Default page size for notification listing.
const DEFAULT_LIMIT: i64 = 50;

/// GET /api/v1/notifications
///
/// List notifications with optional filtering.
pub async fn list_notifications(
    State(state): State<AppState>,
    Query(params): Query<NotificationQuery>,
) -> AppResult<Json<serde_json::Value>> {
    // Postgres rejects negative LIMIT/OFFSET values.
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(0, MAX_LIMIT);
    let offset = params.offset.unwrap_or(0).max(0);
    let unread_only = params.unread_only.unwrap_or(false);

    let notifications = NotificationRepo::list(&state.pool, unread_only, limit, offset).await?;

    Ok(Json(serde_json::json!({ "data": notifications })))
}

/// POST /api/v1/notifications/{id}/read
///
/// Mark a single notification as read. Returns 204 No Content on success,
/// or 404 if no unread notification with that id exists.
pub async fn mark_read(
    State(state): State<AppState>,
    Path(notification_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let found = NotificationRepo::mark_read(&state.pool, notification_id).await?;

    if !found {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Notification",
            id: notification_id,
        }));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/notifications/read-all
///
/// Mark all unread notifications as read. Returns the number marked.
pub async fn mark_all_read(
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let count = NotificationRepo::mark_all_read(&state.pool).await?;

    Ok(Json(serde_json::json!({
        "data": { "marked_read": count }
    })))
}

/// GET /api/v1/notifications/unread-count
///
/// Return the number of unread notifications.
pub async fn unread_count(State(state): State<AppState>) -> AppResult<Json<serde_json::Value>> {
    let count = NotificationRepo::unread_count(&state.pool).await?;

    Ok(Json(serde_json::json!({
        "data": { "count": count }
    })))
}
