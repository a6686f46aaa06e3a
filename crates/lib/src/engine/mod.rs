//! In-memory reference build engine.
//!
//! Implements every engine contract the protocol depends on from a declarative
//! [`BuildDescription`], so client actions can run without an external build tool.
//!
//! # Lifecycle
//!
//! 1. Check cancellation and resolve the requested tasks into a [`TaskGraph`].
//! 2. Evaluate: configure the root project of the root build, then either the
//!    projects owning requested tasks (configure-on-demand) or every project
//!    of the root build.
//! 3. Fire `projects_evaluated`.
//! 4. For `run`, execute tasks in dependency order, configuring the owning
//!    project of each task first and checking cancellation before each one.
//! 5. Fire `build_finished` with the failure so far. A failure returned from
//!    the hook replaces it.

mod description;
mod state;
mod tasks;

pub use description::{BuildDescription, BuildSpec, DescriptionError, ProjectSpec, TaskSpec};
pub use state::EngineState;
pub use tasks::{TaskGraph, TaskRef};

use std::path::Path;

use tracing::{debug, info, warn};

use crate::build::{
  BuildController, BuildFailure, BuildListener, BuildResult, CancellationToken, ProjectConfigurer, ProjectRef,
  StartParameter,
};

/// A [`BuildController`] over an in-memory build tree.
#[derive(Debug)]
pub struct InMemoryBuild {
  state: EngineState,
  start_parameter: StartParameter,
  executed_tasks: Vec<TaskRef>,
}

impl InMemoryBuild {
  pub fn new(description: BuildDescription) -> Result<Self, DescriptionError> {
    Self::with_cancellation(description, CancellationToken::new())
  }

  /// Create a build observing `token` for cancellation.
  pub fn with_cancellation(description: BuildDescription, token: CancellationToken) -> Result<Self, DescriptionError> {
    Ok(Self {
      state: EngineState::new(description, token)?,
      start_parameter: StartParameter::default(),
      executed_tasks: Vec::new(),
    })
  }

  /// Load the description from a JSON file.
  pub fn load(path: &Path) -> Result<Self, DescriptionError> {
    Self::new(BuildDescription::load(path)?)
  }

  pub fn cancellation_token(&self) -> &CancellationToken {
    self.state.cancellation_token()
  }

  pub fn start_parameter(&self) -> &StartParameter {
    &self.start_parameter
  }

  pub fn state(&self) -> &EngineState {
    &self.state
  }

  /// Tasks executed so far, in execution order.
  pub fn executed_tasks(&self) -> &[TaskRef] {
    &self.executed_tasks
  }

  fn execute(&mut self, listener: &mut dyn BuildListener, run_tasks: bool) -> BuildResult<()> {
    let failure = self.evaluate_and_execute(listener, run_tasks).err();

    if let Some(failure) = &failure {
      warn!(error = %failure, "build failed");
    }

    match listener.build_finished(failure.as_ref(), &self.state) {
      Err(hook_failure) => Err(hook_failure),
      Ok(()) => failure.map_or(Ok(()), Err),
    }
  }

  fn evaluate_and_execute(&mut self, listener: &mut dyn BuildListener, run_tasks: bool) -> BuildResult<()> {
    self.state.check_cancelled()?;

    let graph = self.task_graph()?;
    self.evaluate(&graph)?;
    listener.projects_evaluated(&mut self.state)?;

    if run_tasks {
      self.execute_tasks(&graph)?;
    }
    Ok(())
  }

  fn task_graph(&self) -> BuildResult<TaskGraph> {
    let root = self.state.root_build_id();
    let requested = self
      .start_parameter
      .task_names
      .iter()
      .map(|name| {
        TaskRef::parse(name, &root).ok_or_else(|| BuildFailure::failed(format!("Invalid task path '{}'.", name)))
      })
      .collect::<BuildResult<Vec<_>>>()?;

    TaskGraph::build(&requested, |task| self.state.task_dependencies(task))
  }

  fn evaluate(&mut self, graph: &TaskGraph) -> BuildResult<()> {
    let root = ProjectRef::root(self.state.root_build_id());
    info!(
      build = %root.build,
      configure_on_demand = self.start_parameter.configure_on_demand,
      tasks = graph.len(),
      "evaluating build"
    );

    self.state.configure_project(&root)?;
    if self.start_parameter.configure_on_demand {
      for project in graph.projects().iter().filter(|p| p.build == root.build) {
        self.state.configure_project(project)?;
      }
    } else {
      self.state.configure_hierarchy_fully(&root)?;
    }
    Ok(())
  }

  fn execute_tasks(&mut self, graph: &TaskGraph) -> BuildResult<()> {
    for task in graph.ordered() {
      self.state.check_cancelled()?;
      self.state.configure_project(&task.project)?;

      debug!(task = %task, "executing task");
      if let Some(message) = self.state.task_failure(task) {
        return Err(BuildFailure::caused_by(
          format!("Execution failed for task '{}'.", task),
          BuildFailure::failed(message),
        ));
      }
      self.executed_tasks.push(task.clone());
    }
    Ok(())
  }
}

impl BuildController for InMemoryBuild {
  fn start_parameter_mut(&mut self) -> &mut StartParameter {
    &mut self.start_parameter
  }

  fn run(&mut self, listener: &mut dyn BuildListener) -> BuildResult<()> {
    self.execute(listener, true)
  }

  fn configure(&mut self, listener: &mut dyn BuildListener) -> BuildResult<()> {
    self.execute(listener, false)
  }
}
