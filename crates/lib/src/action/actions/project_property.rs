use serde::Deserialize;
use serde_json::json;

use crate::action::{ActionConvention, ActionObject, InternalBuildActionV2, InternalBuildControllerV2};
use crate::build::{
  BUILD_MODEL, BuildFailure, BuildId, BuildModel, BuildResult, Model, ModelTarget, PROPERTY_MODEL, ProjectPath,
  ProjectRef,
};
use crate::serialize::SerializeError;

use super::parse_params;

pub const NAME: &str = "project-property";

#[derive(Deserialize)]
struct ProjectPropertyParams {
  #[serde(default)]
  build: Option<String>,
  project: ProjectPath,
  property: String,
}

/// Reads one property of one project through the parameterized `property` model.
///
/// Only the current calling convention can pass model parameters, so a payload
/// requesting the legacy convention yields an object with no usable convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPropertyAction {
  /// Owning build; the root build when absent.
  pub build: Option<BuildId>,
  pub project: ProjectPath,
  pub property: String,
  pub convention: ActionConvention,
}

impl ProjectPropertyAction {
  pub fn from_params(convention: ActionConvention, params: Model) -> Result<Self, SerializeError> {
    let ProjectPropertyParams {
      build,
      project,
      property,
    } = parse_params(NAME, params)?;
    Ok(Self {
      build: build.map(BuildId::new),
      project,
      property,
      convention,
    })
  }
}

impl InternalBuildActionV2 for ProjectPropertyAction {
  fn execute(&self, controller: &dyn InternalBuildControllerV2) -> BuildResult<Model> {
    let build = match &self.build {
      Some(build) => build.clone(),
      None => {
        let root: BuildModel = serde_json::from_value(controller.build_model()?)
          .map_err(|e| BuildFailure::failed(format!("unexpected {} model: {}", BUILD_MODEL, e)))?;
        BuildId::new(root.name)
      }
    };
    let target = ModelTarget::Project(ProjectRef::new(build, self.project.clone()));
    controller.get_model_with_parameter(&target, PROPERTY_MODEL, &json!({ "name": self.property }))
  }
}

impl ActionObject for ProjectPropertyAction {
  fn type_name(&self) -> &str {
    NAME
  }

  fn as_current(&self) -> Option<&dyn InternalBuildActionV2> {
    (self.convention == ActionConvention::Current).then_some(self as &dyn InternalBuildActionV2)
  }
}
