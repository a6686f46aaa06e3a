use std::collections::{BTreeSet, VecDeque};

use crate::action::{
  ActionConvention, ActionObject, InternalBuildAction, InternalBuildActionV2, InternalBuildController,
  InternalBuildControllerV2,
};
use crate::build::{BUILD_MODEL, BuildFailure, BuildId, BuildModel, BuildResult, Model, ModelTarget};

pub const NAME: &str = "project-paths";

/// Returns `{ <build name>: [project paths] }` for the root build and every
/// build reachable from it through includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectPathsAction {
  pub convention: ActionConvention,
}

impl ProjectPathsAction {
  pub fn new(convention: ActionConvention) -> Self {
    Self { convention }
  }
}

fn decode_build_model(model: Model) -> BuildResult<BuildModel> {
  serde_json::from_value(model).map_err(|e| BuildFailure::failed(format!("unexpected build model: {}", e)))
}

fn collect_project_paths<C>(controller: &C) -> BuildResult<Model>
where
  C: InternalBuildController + ?Sized,
{
  let root = decode_build_model(controller.build_model()?)?;
  let mut seen = BTreeSet::from([root.name.clone()]);
  let mut pending = VecDeque::from([root]);
  let mut result = serde_json::Map::new();

  while let Some(build) = pending.pop_front() {
    for included in &build.includes {
      if seen.insert(included.clone()) {
        let target = ModelTarget::Build(BuildId::new(included.clone()));
        pending.push_back(decode_build_model(controller.get_model(&target, BUILD_MODEL)?)?);
      }
    }
    result.insert(build.name, Model::from(build.projects));
  }

  Ok(Model::Object(result))
}

impl InternalBuildAction for ProjectPathsAction {
  fn execute(&self, controller: &dyn InternalBuildController) -> BuildResult<Model> {
    collect_project_paths(controller)
  }
}

impl InternalBuildActionV2 for ProjectPathsAction {
  fn execute(&self, controller: &dyn InternalBuildControllerV2) -> BuildResult<Model> {
    collect_project_paths(controller)
  }
}

impl ActionObject for ProjectPathsAction {
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
