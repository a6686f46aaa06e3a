use serde::{Deserialize, Serialize};

use crate::build::SharedFailure;
use crate::serialize::SerializedPayload;

/// The envelope returned to the client.
///
/// Exactly one of the serialized model or the serialized failure is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildActionResult {
  Model(SerializedPayload),
  Failure(SerializedPayload),
}

impl BuildActionResult {
  pub fn is_success(&self) -> bool {
    matches!(self, BuildActionResult::Model(_))
  }

  pub fn model_bytes(&self) -> Option<&SerializedPayload> {
    match self {
      BuildActionResult::Model(bytes) => Some(bytes),
      BuildActionResult::Failure(_) => None,
    }
  }

  pub fn failure_bytes(&self) -> Option<&SerializedPayload> {
    match self {
      BuildActionResult::Model(_) => None,
      BuildActionResult::Failure(bytes) => Some(bytes),
    }
  }
}

/// What a runner hands back to its host.
///
/// `result` travels to the client; `failure` is the raw failure kept on the
/// host side for diagnostics and is set exactly when `result` is a failure.
#[derive(Debug, Clone)]
pub struct RunResult {
  pub result: BuildActionResult,
  pub failure: Option<SharedFailure>,
}

impl RunResult {
  pub fn success(model: SerializedPayload) -> Self {
    Self {
      result: BuildActionResult::Model(model),
      failure: None,
    }
  }

  pub fn failed(descriptor: SerializedPayload, failure: SharedFailure) -> Self {
    Self {
      result: BuildActionResult::Failure(descriptor),
      failure: Some(failure),
    }
  }
}
