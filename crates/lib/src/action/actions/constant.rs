use serde::Deserialize;

use crate::action::{
  ActionConvention, ActionObject, InternalBuildAction, InternalBuildActionV2, InternalBuildController,
  InternalBuildControllerV2,
};
use crate::build::{BuildResult, Model};
use crate::serialize::SerializeError;

use super::parse_params;

pub const NAME: &str = "constant";

#[derive(Deserialize)]
struct ConstantParams {
  value: Model,
}

/// Returns `params.value` without touching the build.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantAction {
  pub value: Model,
  pub convention: ActionConvention,
}

impl ConstantAction {
  pub fn from_params(convention: ActionConvention, params: Model) -> Result<Self, SerializeError> {
    let ConstantParams { value } = parse_params(NAME, params)?;
    Ok(Self { value, convention })
  }
}

impl InternalBuildAction for ConstantAction {
  fn execute(&self, _controller: &dyn InternalBuildController) -> BuildResult<Model> {
    Ok(self.value.clone())
  }
}

impl InternalBuildActionV2 for ConstantAction {
  fn execute(&self, _controller: &dyn InternalBuildControllerV2) -> BuildResult<Model> {
    Ok(self.value.clone())
  }
}

impl ActionObject for ConstantAction {
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
