//! The model-access surface handed to client actions.

use tracing::debug;

use crate::action::types::{InternalBuildController, InternalBuildControllerV2};
use crate::build::{BUILD_MODEL, BuildFailure, BuildId, BuildResult, Model, ModelProvider, ModelTarget};

/// Read-scoped view of a finished build, valid for one action invocation.
///
/// Every query checks for cancellation before reaching the engine.
pub struct DefaultBuildController<'a> {
  models: &'a dyn ModelProvider,
  root: BuildId,
}

impl<'a> DefaultBuildController<'a> {
  pub fn new(models: &'a dyn ModelProvider, root: BuildId) -> Self {
    Self { models, root }
  }

  fn query(&self, target: &ModelTarget, name: &str, parameter: Option<&Model>) -> BuildResult<Model> {
    if self.models.is_cancellation_requested() {
      return Err(BuildFailure::cancelled("Build cancelled while querying models."));
    }
    debug!(target = %target, model = name, "client action requested model");
    self.models.get_model(target, name, parameter)
  }
}

impl InternalBuildController for DefaultBuildController<'_> {
  fn build_model(&self) -> BuildResult<Model> {
    self.query(&ModelTarget::Build(self.root.clone()), BUILD_MODEL, None)
  }

  fn get_model(&self, target: &ModelTarget, name: &str) -> BuildResult<Model> {
    self.query(target, name, None)
  }
}

impl InternalBuildControllerV2 for DefaultBuildController<'_> {
  fn get_model_with_parameter(&self, target: &ModelTarget, name: &str, parameter: &Model) -> BuildResult<Model> {
    self.query(target, name, Some(parameter))
  }

  fn cancellation_requested(&self) -> bool {
    self.models.is_cancellation_requested()
  }
}
