//! Configuration state and models of an in-memory build tree.

use std::collections::BTreeMap;

use serde_json::json;
use tracing::debug;

use crate::build::{
  BUILD_MODEL, BuildFailure, BuildId, BuildModel, BuildResult, BuildTree, CancellationToken, Model, ModelProvider,
  ModelTarget, PROJECT_MODEL, PROPERTIES_MODEL, PROPERTY_MODEL, ProjectConfigurer, ProjectPath, ProjectRef,
  TASKS_MODEL,
};

use super::description::{BuildDescription, DescriptionError};
use super::tasks::TaskRef;

#[derive(Debug)]
struct EngineTask {
  depends_on: Vec<TaskRef>,
  failure: Option<String>,
}

#[derive(Debug, Default)]
struct EngineProject {
  properties: BTreeMap<String, Model>,
  tasks: BTreeMap<String, EngineTask>,
  evaluation_failure: Option<String>,
  configured: bool,
}

#[derive(Debug)]
struct EngineBuild {
  includes: Vec<BuildId>,
  projects: BTreeMap<ProjectPath, EngineProject>,
}

/// Every build of a tree with the configuration state of its projects.
#[derive(Debug)]
pub struct EngineState {
  root: BuildId,
  builds: BTreeMap<BuildId, EngineBuild>,
  configuration_log: Vec<ProjectRef>,
  cancellation: CancellationToken,
}

impl EngineState {
  /// Create unconfigured state for `description`.
  ///
  /// Every build gets a root project, and every project's ancestors exist.
  pub fn new(description: BuildDescription, cancellation: CancellationToken) -> Result<Self, DescriptionError> {
    description.validate()?;

    let mut builds = BTreeMap::new();
    for (name, spec) in &description.builds {
      let build_id = BuildId::new(name.clone());
      let mut projects: BTreeMap<ProjectPath, EngineProject> = BTreeMap::new();
      projects.insert(ProjectPath::root(), EngineProject::default());

      for (path, project) in &spec.projects {
        for ancestor in path.ancestors() {
          projects.entry(ancestor).or_default();
        }

        let mut tasks = BTreeMap::new();
        for (task_name, task) in &project.tasks {
          let mut depends_on = Vec::new();
          for dependency in &task.depends_on {
            let resolved = description.resolve_dependency(&build_id, dependency).map_err(|reason| {
              DescriptionError::InvalidDependency {
                task: format!("{}/{}", build_id, TaskRef::task_path(path, task_name)),
                dependency: dependency.clone(),
                reason,
              }
            })?;
            depends_on.push(resolved);
          }
          tasks.insert(
            task_name.clone(),
            EngineTask {
              depends_on,
              failure: task.failure.clone(),
            },
          );
        }

        projects.insert(
          path.clone(),
          EngineProject {
            properties: project.properties.clone(),
            tasks,
            evaluation_failure: project.evaluation_failure.clone(),
            configured: false,
          },
        );
      }

      builds.insert(
        build_id,
        EngineBuild {
          includes: spec.includes.iter().cloned().map(BuildId::new).collect(),
          projects,
        },
      );
    }

    Ok(Self {
      root: BuildId::new(description.root),
      builds,
      configuration_log: Vec::new(),
      cancellation,
    })
  }

  pub fn root_build_id(&self) -> BuildId {
    self.root.clone()
  }

  pub fn cancellation_token(&self) -> &CancellationToken {
    &self.cancellation
  }

  /// Fail with a cancellation-class failure if cancellation was requested.
  pub fn check_cancelled(&self) -> BuildResult<()> {
    if self.cancellation.is_cancellation_requested() {
      return Err(BuildFailure::cancelled("Build cancelled."));
    }
    Ok(())
  }

  /// Every project configuration performed so far, in order.
  pub fn configuration_log(&self) -> &[ProjectRef] {
    &self.configuration_log
  }

  pub fn is_configured(&self, project: &ProjectRef) -> bool {
    self.project(project).map(|p| p.configured).unwrap_or(false)
  }

  /// Configure `project` after its ancestors. Configured projects are skipped.
  pub fn configure_project(&mut self, project: &ProjectRef) -> BuildResult<()> {
    for ancestor in project.path.ancestors() {
      self.configure_one(&ProjectRef::new(project.build.clone(), ancestor))?;
    }
    self.configure_one(project)
  }

  /// Direct dependencies of `task`, or `None` when it does not exist.
  pub fn task_dependencies(&self, task: &TaskRef) -> Option<Vec<TaskRef>> {
    self
      .project(&task.project)
      .ok()
      .and_then(|p| p.tasks.get(&task.name))
      .map(|t| t.depends_on.clone())
  }

  pub fn task_failure(&self, task: &TaskRef) -> Option<&str> {
    self
      .project(&task.project)
      .ok()
      .and_then(|p| p.tasks.get(&task.name))
      .and_then(|t| t.failure.as_deref())
  }

  fn build(&self, id: &BuildId) -> BuildResult<&EngineBuild> {
    self
      .builds
      .get(id)
      .ok_or_else(|| BuildFailure::failed(format!("Build '{}' is not part of this build tree.", id)))
  }

  fn project(&self, project: &ProjectRef) -> BuildResult<&EngineProject> {
    self
      .build(&project.build)?
      .projects
      .get(&project.path)
      .ok_or_else(|| BuildFailure::failed(format!("Project '{}' not found.", project)))
  }

  fn configure_one(&mut self, project: &ProjectRef) -> BuildResult<()> {
    let state = self
      .builds
      .get_mut(&project.build)
      .and_then(|b| b.projects.get_mut(&project.path))
      .ok_or_else(|| BuildFailure::failed(format!("Project '{}' not found.", project)))?;

    if state.configured {
      return Ok(());
    }
    if let Some(message) = &state.evaluation_failure {
      return Err(BuildFailure::caused_by(
        format!("A problem occurred evaluating project '{}'.", project),
        BuildFailure::failed(message.clone()),
      ));
    }

    state.configured = true;
    debug!(project = %project, "configured project");
    self.configuration_log.push(project.clone());
    Ok(())
  }

  fn build_model(&self, id: &BuildId) -> BuildResult<Model> {
    let build = self.build(id)?;
    let model = BuildModel {
      name: id.to_string(),
      projects: build.projects.keys().map(|p| p.to_string()).collect(),
      includes: build.includes.iter().map(|b| b.to_string()).collect(),
    };
    serde_json::to_value(model)
      .map_err(|e| BuildFailure::failed(format!("failed to build {} model: {}", BUILD_MODEL, e)))
  }

  fn project_model(&self, project: &ProjectRef, name: &str, parameter: Option<&Model>) -> BuildResult<Model> {
    let state = self.project(project)?;
    if !state.configured {
      return Err(BuildFailure::failed(format!(
        "Project '{}' has not been configured.",
        project
      )));
    }

    let task_names: Vec<&str> = state.tasks.keys().map(String::as_str).collect();
    match name {
      PROJECT_MODEL => Ok(json!({
        "path": project.path,
        "build": project.build,
        "properties": state.properties,
        "tasks": task_names,
      })),
      PROPERTIES_MODEL => Ok(json!(state.properties)),
      TASKS_MODEL => Ok(json!(task_names)),
      PROPERTY_MODEL => {
        let property = parameter
          .and_then(|p| p.get("name"))
          .and_then(Model::as_str)
          .ok_or_else(|| {
            BuildFailure::failed(format!(
              "The '{}' model requires a {{\"name\": ...}} parameter.",
              PROPERTY_MODEL
            ))
          })?;
        state
          .properties
          .get(property)
          .cloned()
          .ok_or_else(|| BuildFailure::failed(format!("Project '{}' has no property '{}'.", project, property)))
      }
      other => Err(BuildFailure::failed(format!(
        "No model of type '{}' is available for project '{}'.",
        other, project
      ))),
    }
  }
}

impl ProjectConfigurer for EngineState {
  fn configure_hierarchy_fully(&mut self, root: &ProjectRef) -> BuildResult<()> {
    self.configure_project(root)?;

    let descendants: Vec<ProjectPath> = self
      .build(&root.build)?
      .projects
      .keys()
      .filter(|path| path.is_within(&root.path))
      .cloned()
      .collect();
    for path in descendants {
      self.configure_one(&ProjectRef::new(root.build.clone(), path))?;
    }
    Ok(())
  }
}

impl ModelProvider for EngineState {
  fn get_model(&self, target: &ModelTarget, name: &str, parameter: Option<&Model>) -> BuildResult<Model> {
    match target {
      ModelTarget::Build(id) if name == BUILD_MODEL => self.build_model(id),
      ModelTarget::Build(id) => Err(BuildFailure::failed(format!(
        "No model of type '{}' is available for build '{}'.",
        name, id
      ))),
      ModelTarget::Project(project) => self.project_model(project, name, parameter),
    }
  }

  fn is_cancellation_requested(&self) -> bool {
    self.cancellation.is_cancellation_requested()
  }
}

impl BuildTree for EngineState {
  fn root_build(&self) -> BuildId {
    self.root.clone()
  }

  fn included_builds(&self, build: &BuildId) -> BuildResult<Vec<BuildId>> {
    Ok(self.build(build)?.includes.clone())
  }

  fn project_configurer(&mut self) -> &mut dyn ProjectConfigurer {
    self
  }

  fn models(&self) -> &dyn ModelProvider {
    self
  }
}
