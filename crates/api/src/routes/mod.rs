pub mod content;
pub mod health;
pub mod notification;
pub mod trash;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /content                         list, create
/// /content/{id}                    get, update (PATCH), soft delete (DELETE)
///
/// /trash                           list trashed items
/// /trash/{id}/restore              restore (POST)
/// /trash/{id}/purge                permanent delete (DELETE)
///
/// /notifications                   list
/// /notifications/unread-count      unread count
/// /notifications/read-all          mark all read (POST)
/// /notifications/{id}/read         mark read (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/content", content::router())
        .nest("/trash", trash::router())
        .nest("/notifications", notification::router())
}
