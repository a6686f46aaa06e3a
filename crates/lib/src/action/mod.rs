//! Client build actions.
//!
//! A client action is an opaque object deserialized from a request payload.
//! It is executed exactly once against a [`DefaultBuildController`], the
//! model-access surface of the build that just finished.
//!
//! # Calling Conventions
//!
//! - [`InternalBuildAction`] - legacy: build model and unparameterized model queries
//! - [`InternalBuildActionV2`] - current: adds parameterized queries and cancellation checks
//!
//! [`ClientAction::select`] picks the convention an [`ActionObject`] supports,
//! preferring the current one.
//!
//! # Built-in Actions
//!
//! See [`actions`] for the action types registered by
//! [`ActionRegistry::with_builtins`](crate::serialize::ActionRegistry::with_builtins).

pub mod actions;
pub mod controller;
mod types;

pub use controller::DefaultBuildController;
pub use types::*;
