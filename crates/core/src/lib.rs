//! Domain logic for the school CMS backend.
//!
//! This crate has zero internal dependencies so it can be used by the
//! repository layer, the lifecycle/notification services, and the API
//! server alike. It contains:
//!
//! - [`types`] — shared ID and timestamp aliases
//! - [`error`] — the domain error taxonomy
//! - [`clock`] — injectable time source
//! - [`lifecycle`] — the publication lifecycle evaluator
//! - [`trash`] — the soft-delete / restore / purge state machine

pub mod clock;
pub mod error;
pub mod lifecycle;
pub mod trash;
pub mod types;
