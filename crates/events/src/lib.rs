//! Lifecycle transition processing and notification dispatch.
//!
//! This crate sits between the repository layer and the API server:
//!
//! - [`NotificationDispatcher`] — persists one notification per detected
//!   lifecycle transition, idempotently.
//! - [`LifecycleService`] — commits time-driven transitions (atomic
//!   check-and-set per record) and runs the periodic lifecycle tick.

pub mod dispatcher;
pub mod lifecycle;

pub use dispatcher::NotificationDispatcher;
pub use lifecycle::LifecycleService;
