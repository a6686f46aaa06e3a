//! Execution of client-provided build actions.
//!
//! [`ClientProvidedBuildActionRunner`] is the protocol entry point. For one
//! request it:
//!
//! 1. Disables configure-on-demand for the invocation
//! 2. Deserializes the client action and selects its calling convention
//! 3. Runs or configures the build with a [`ResultBuildingListener`] attached
//! 4. Classifies the driver and action outcomes into one [`FailureCategory`](crate::protocol::FailureCategory)
//! 5. Serializes either the model or the failure descriptor into the envelope

mod client;
mod listener;

pub use client::ClientProvidedBuildActionRunner;
pub use listener::{ListenerOutcome, ResultBuildingListener, force_full_configuration};

use thiserror::Error;

use crate::serialize::SerializeError;

/// Faults of the protocol itself, as opposed to build or action failures.
///
/// These are never folded into the envelope.
#[derive(Debug, Error)]
pub enum ProtocolError {
  /// The payload serializer failed.
  #[error("payload serialization failed: {0}")]
  Serialization(#[from] SerializeError),

  /// The deserialized action object supports no calling convention.
  #[error("action '{0}' supports no build action calling convention")]
  UnsupportedAction(String),

  /// The driver finished without failure but never invoked the action.
  #[error("build finished without invoking the client action")]
  ActionNotInvoked,
}
