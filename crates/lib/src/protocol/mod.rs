//! Client-facing protocol types.
//!
//! A [`BuildActionRequest`] carries an opaque action payload. Its outcome is a
//! [`BuildActionResult`] envelope holding either the serialized model or a
//! serialized [`FailureDescriptor`], never both.

mod failure;
mod result;

pub use failure::{FailureCategory, FailureDescriptor, FailureKind};
pub use result::{BuildActionResult, RunResult};

use serde::{Deserialize, Serialize};

use crate::serialize::SerializedPayload;

/// A client request to execute an action against a configured build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildActionRequest {
  /// Execute the requested tasks; when false the build is only configured.
  pub run_tasks: bool,

  /// Serialized client action.
  pub action: SerializedPayload,
}

impl BuildActionRequest {
  pub fn new(action: SerializedPayload, run_tasks: bool) -> Self {
    Self { run_tasks, action }
  }
}
