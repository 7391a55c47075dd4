//! Periodic lifecycle evaluator tick.
//!
//! Spawns a background loop that promotes purely time-triggered transitions
//! (Scheduled -> Published, Published -> Archived) with no editor action.
//! Runs on a fixed interval using `tokio::time::interval`. A tick that fails
//! against a slow store simply logs and retries on the next cycle.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use scms_core::clock::Clock;
use scms_db::DbPool;
use scms_events::LifecycleService;

/// Run the lifecycle tick loop.
///
/// Evaluates due records every `interval_secs` seconds until `cancel` is
/// triggered.
pub async fn run(
    pool: DbPool,
    clock: Arc<dyn Clock>,
    interval_secs: u64,
    cancel: CancellationToken,
) {
    tracing::info!(interval_secs, "Lifecycle tick started");

    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Lifecycle tick stopping");
                break;
            }
            _ = interval.tick() => {
                match LifecycleService::run_lifecycle_tick(&pool, clock.now()).await {
                    Ok(events) => {
                        if !events.is_empty() {
                            tracing::info!(
                                count = events.len(),
                                "Lifecycle tick: committed transitions"
                            );
                        } else {
                            tracing::debug!("Lifecycle tick: nothing due");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Lifecycle tick failed, retrying next cycle");
                    }
                }
            }
        }
    }
}
