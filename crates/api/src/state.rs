use std::sync::Arc;

use scms_core::clock::Clock;

use crate::assets::AssetStore;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: scms_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Attachment storage rooted at the configured media directory.
    pub assets: Arc<AssetStore>,
    /// Time source. Production uses the system clock; tests inject a fixed one.
    pub clock: Arc<dyn Clock>,
}
