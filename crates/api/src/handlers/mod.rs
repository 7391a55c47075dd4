//! Request handlers.
//!
//! Each submodule provides async handler functions for a single resource.
//! Handlers delegate to the repositories in `scms_db` and the lifecycle
//! services in `scms_events`, and map errors via [`AppError`].
//!
//! [`AppError`]: crate::error::AppError

pub mod content;
pub mod notification;
pub mod trash;
