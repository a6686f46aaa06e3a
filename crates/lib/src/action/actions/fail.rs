use serde::Deserialize;

use crate::action::{
  ActionConvention, ActionObject, InternalBuildAction, InternalBuildActionV2, InternalBuildController,
  InternalBuildControllerV2,
};
use crate::build::{BuildFailure, BuildResult, Model, SharedFailure};
use crate::serialize::SerializeError;

use super::parse_params;

pub const NAME: &str = "fail";

#[derive(Deserialize)]
struct FailParams {
  message: String,
  #[serde(default)]
  cancel: bool,
}

/// Fails with `params.message`; a cancellation-class failure when `params.cancel` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailAction {
  pub message: String,
  pub cancel: bool,
  pub convention: ActionConvention,
}

impl FailAction {
  pub fn from_params(convention: ActionConvention, params: Model) -> Result<Self, SerializeError> {
    let FailParams { message, cancel } = parse_params(NAME, params)?;
    Ok(Self {
      message,
      cancel,
      convention,
    })
  }

  fn failure(&self) -> SharedFailure {
    if self.cancel {
      BuildFailure::cancelled(self.message.clone())
    } else {
      BuildFailure::failed(self.message.clone())
    }
  }
}

impl InternalBuildAction for FailAction {
  fn execute(&self, _controller: &dyn InternalBuildController) -> BuildResult<Model> {
    Err(self.failure())
  }
}

impl InternalBuildActionV2 for FailAction {
  fn execute(&self, _controller: &dyn InternalBuildControllerV2) -> BuildResult<Model> {
    Err(self.failure())
  }
}

impl ActionObject for FailAction {
  fn type_name(&self) -> &str {
    NAME
  }

  fn as_current(&self) -> Option<&dyn InternalBuildActionV2> {
    (self.convention == ActionConvention::Current).then_some(self as &dyn InternalBuildActionV2)
  }

  fn as_legacy(&self) -> Option<&dyn InternalBuildAction> {
    (self.convention == ActionConvention::Legacy).then_some(self as &dyn InternalBuildAction)
  }
}
