//! Route definitions for the `/content` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::content;
use crate::state::AppState;

/// Routes mounted at `/content`.
///
/// ```text
/// GET    /        -> list
/// POST   /        -> create
/// GET    /{id}    -> get_by_id
/// PATCH  /{id}    -> update
/// DELETE /{id}    -> soft_delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(content::list).post(content::create))
        .route(
            "/{id}",
            get(content::get_by_id)
                .patch(content::update)
                .delete(content::soft_delete),
        )
}
