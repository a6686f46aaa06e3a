//! Payload serialization.
//!
//! The protocol treats serialization as an opaque collaborator behind
//! [`PayloadSerializer`]. [`JsonPayloadSerializer`] is the implementation
//! shipped with this crate: models and failure descriptors are JSON documents,
//! and action payloads name a type registered in an [`ActionRegistry`].

mod json;
mod registry;

pub use json::{ActionPayload, JsonPayloadSerializer};
pub use registry::{ActionFactory, ActionRegistry};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::action::ActionObject;
use crate::build::Model;
use crate::protocol::FailureDescriptor;

/// Opaque serialized bytes crossing the client boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SerializedPayload(pub Vec<u8>);

impl SerializedPayload {
  pub fn as_bytes(&self) -> &[u8] {
    &self.0
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

impl From<Vec<u8>> for SerializedPayload {
  fn from(bytes: Vec<u8>) -> Self {
    Self(bytes)
  }
}

/// Errors raised by a payload serializer.
#[derive(Debug, Error)]
pub enum SerializeError {
  /// The payload is not a valid document.
  #[error("malformed payload: {0}")]
  Malformed(#[from] serde_json::Error),

  /// The action payload names a type nobody registered.
  #[error("unknown action type '{0}'")]
  UnknownAction(String),

  /// The action payload requests a protocol version this side does not speak.
  #[error("unsupported action protocol version {0}")]
  UnsupportedVersion(u32),

  /// The action parameters do not match what the action type expects.
  #[error("invalid parameters for action '{kind}': {message}")]
  InvalidParams { kind: String, message: String },
}

/// Bidirectional transform between objects and [`SerializedPayload`]s.
pub trait PayloadSerializer {
  fn deserialize_action(&self, payload: &SerializedPayload) -> Result<Box<dyn ActionObject>, SerializeError>;

  fn serialize_model(&self, model: &Model) -> Result<SerializedPayload, SerializeError>;

  fn deserialize_model(&self, payload: &SerializedPayload) -> Result<Model, SerializeError>;

  fn serialize_failure(&self, failure: &FailureDescriptor) -> Result<SerializedPayload, SerializeError>;

  fn deserialize_failure(&self, payload: &SerializedPayload) -> Result<FailureDescriptor, SerializeError>;
}
