//! Contracts between the protocol and the build engine that drives it.

use serde::{Deserialize, Serialize};

use super::failure::{BuildResult, SharedFailure};
use super::types::{BuildId, ModelTarget, ProjectRef, StartParameter};

/// A model object as produced by the engine or returned by a client action.
pub type Model = serde_json::Value;

/// Build-level model served for [`ModelTarget::Build`]; decodes as [`BuildModel`].
pub const BUILD_MODEL: &str = "build";
/// Project summary: path, build, properties and task names.
pub const PROJECT_MODEL: &str = "project";
pub const PROPERTIES_MODEL: &str = "properties";
pub const TASKS_MODEL: &str = "tasks";
/// Single project property; takes `{ "name": <property> }` as parameter.
pub const PROPERTY_MODEL: &str = "property";

/// The build-level model of one build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildModel {
  pub name: String,
  pub projects: Vec<String>,
  pub includes: Vec<String>,
}

/// Drives a single build invocation.
///
/// `run` and `configure` fire the listener's hooks synchronously on the calling
/// thread: `projects_evaluated` at most once after evaluation succeeds, then
/// `build_finished` exactly once before returning. A failure returned from a
/// hook becomes the failure of the invocation.
pub trait BuildController {
  fn start_parameter_mut(&mut self) -> &mut StartParameter;

  /// Evaluate the build and execute the requested tasks.
  fn run(&mut self, listener: &mut dyn BuildListener) -> BuildResult<()>;

  /// Evaluate the build without executing tasks.
  fn configure(&mut self, listener: &mut dyn BuildListener) -> BuildResult<()>;
}

/// Lifecycle hooks fired by a [`BuildController`].
pub trait BuildListener {
  fn projects_evaluated(&mut self, build: &mut dyn BuildTree) -> BuildResult<()>;

  /// `failure` is the failure of the build so far, if any.
  fn build_finished(&mut self, failure: Option<&SharedFailure>, build: &dyn BuildTree) -> BuildResult<()>;
}

/// The engine's view of the build tree as seen by lifecycle hooks.
pub trait BuildTree {
  fn root_build(&self) -> BuildId;

  /// Builds directly included by `build`, in declaration order.
  fn included_builds(&self, build: &BuildId) -> BuildResult<Vec<BuildId>>;

  fn project_configurer(&mut self) -> &mut dyn ProjectConfigurer;

  fn models(&self) -> &dyn ModelProvider;
}

/// Configures project hierarchies.
pub trait ProjectConfigurer {
  /// Configure `root` and every project below it. Projects that are already
  /// configured are left untouched.
  fn configure_hierarchy_fully(&mut self, root: &ProjectRef) -> BuildResult<()>;
}

/// Read access to the models of a configured build tree.
pub trait ModelProvider {
  fn get_model(&self, target: &ModelTarget, name: &str, parameter: Option<&Model>) -> BuildResult<Model>;

  fn is_cancellation_requested(&self) -> bool;
}
