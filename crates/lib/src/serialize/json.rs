use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::action::{ActionConvention, ActionObject};
use crate::build::Model;
use crate::protocol::FailureDescriptor;

use super::{ActionRegistry, PayloadSerializer, SerializeError, SerializedPayload};

fn default_version() -> u32 {
  ActionConvention::CURRENT_VERSION
}

/// Wire form of a client action.
///
/// ```json
/// { "type": "project-property", "version": 2, "params": { "project": ":app", "property": "version" } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionPayload {
  #[serde(rename = "type")]
  pub kind: String,

  /// Protocol version selecting the calling convention (1 = legacy, 2 = current).
  #[serde(default = "default_version")]
  pub version: u32,

  #[serde(default)]
  pub params: Model,
}

impl ActionPayload {
  pub fn new(kind: impl Into<String>) -> Self {
    Self {
      kind: kind.into(),
      version: default_version(),
      params: Model::Null,
    }
  }

  pub fn with_params(mut self, params: Model) -> Self {
    self.params = params;
    self
  }

  pub fn with_convention(mut self, convention: ActionConvention) -> Self {
    self.version = convention.version();
    self
  }
}

/// JSON implementation of [`PayloadSerializer`].
#[derive(Debug)]
pub struct JsonPayloadSerializer {
  registry: ActionRegistry,
}

impl JsonPayloadSerializer {
  pub fn new(registry: ActionRegistry) -> Self {
    Self { registry }
  }

  /// Encode an action payload the way a client would.
  pub fn encode_action(payload: &ActionPayload) -> Result<SerializedPayload, SerializeError> {
    Ok(SerializedPayload(serde_json::to_vec(payload)?))
  }
}

impl Default for JsonPayloadSerializer {
  fn default() -> Self {
    Self::new(ActionRegistry::with_builtins())
  }
}

impl PayloadSerializer for JsonPayloadSerializer {
  fn deserialize_action(&self, payload: &SerializedPayload) -> Result<Box<dyn ActionObject>, SerializeError> {
    let ActionPayload { kind, version, params } = serde_json::from_slice(payload.as_bytes())?;
    let convention = ActionConvention::from_version(version).ok_or(SerializeError::UnsupportedVersion(version))?;
    debug!(action = %kind, ?convention, "deserializing client action");
    self.registry.create(&kind, convention, params)
  }

  fn serialize_model(&self, model: &Model) -> Result<SerializedPayload, SerializeError> {
    Ok(SerializedPayload(serde_json::to_vec(model)?))
  }

  fn deserialize_model(&self, payload: &SerializedPayload) -> Result<Model, SerializeError> {
    Ok(serde_json::from_slice(payload.as_bytes())?)
  }

  fn serialize_failure(&self, failure: &FailureDescriptor) -> Result<SerializedPayload, SerializeError> {
    Ok(SerializedPayload(serde_json::to_vec(failure)?))
  }

  fn deserialize_failure(&self, payload: &SerializedPayload) -> Result<FailureDescriptor, SerializeError> {
    Ok(serde_json::from_slice(payload.as_bytes())?)
  }
}
