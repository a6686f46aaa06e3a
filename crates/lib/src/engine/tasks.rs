//! Task references and the task execution graph.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::build::{BuildFailure, BuildId, BuildResult, ProjectPath, ProjectRef};

/// A task qualified by its project and build.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskRef {
  pub project: ProjectRef,
  pub name: String,
}

impl TaskRef {
  /// Parse `[build/]:project:task`. References without a build prefix belong
  /// to `default_build`.
  ///
  /// `:build` is task `build` of the root project; `:lib:jar` is task `jar`
  /// of project `:lib`.
  pub fn parse(spec: &str, default_build: &BuildId) -> Option<Self> {
    let (build, path) = match spec.split_once('/') {
      Some((build, path)) if !build.is_empty() => (BuildId::new(build), path),
      Some(_) => return None,
      None => (default_build.clone(), spec),
    };
    let (project, name) = path.rsplit_once(ProjectPath::SEPARATOR)?;
    if name.is_empty() {
      return None;
    }
    let project = if project.is_empty() {
      ProjectPath::root()
    } else {
      ProjectPath::parse(project)?
    };
    Some(Self {
      project: ProjectRef::new(build, project),
      name: name.to_string(),
    })
  }

  /// Path of task `name` in `project`, without the build prefix.
  pub fn task_path(project: &ProjectPath, name: &str) -> String {
    if project.is_root() {
      format!(":{}", name)
    } else {
      format!("{}:{}", project, name)
    }
  }
}

impl fmt::Display for TaskRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{}/{}",
      self.project.build,
      TaskRef::task_path(&self.project.path, &self.name)
    )
  }
}

/// The requested tasks and everything they depend on, in execution order.
pub struct TaskGraph {
  graph: DiGraph<TaskRef, ()>,
  order: Vec<NodeIndex>,
}

impl TaskGraph {
  /// Build the graph for `requested`.
  ///
  /// `dependencies_of` returns a task's direct dependencies, or `None` when
  /// the task does not exist.
  pub fn build<F>(requested: &[TaskRef], dependencies_of: F) -> BuildResult<Self>
  where
    F: Fn(&TaskRef) -> Option<Vec<TaskRef>>,
  {
    let mut graph = DiGraph::new();
    let mut nodes: HashMap<TaskRef, NodeIndex> = HashMap::new();
    let mut expanded: HashSet<TaskRef> = HashSet::new();
    let mut pending: Vec<TaskRef> = requested.to_vec();

    while let Some(task) = pending.pop() {
      if !expanded.insert(task.clone()) {
        continue;
      }

      let dependencies =
        dependencies_of(&task).ok_or_else(|| BuildFailure::failed(format!("Task '{}' not found.", task)))?;
      let dependent = *nodes
        .entry(task.clone())
        .or_insert_with(|| graph.add_node(task.clone()));

      for dependency in dependencies {
        let dependency_idx = *nodes
          .entry(dependency.clone())
          .or_insert_with(|| graph.add_node(dependency.clone()));
        // Edge from dependency to dependent
        graph.add_edge(dependency_idx, dependent, ());
        pending.push(dependency);
      }
    }

    let order = toposort(&graph, None).map_err(|cycle| {
      BuildFailure::failed(format!(
        "Circular dependency between tasks involving '{}'.",
        graph[cycle.node_id()]
      ))
    })?;

    Ok(Self { graph, order })
  }

  /// Tasks in an order where every task follows its dependencies.
  pub fn ordered(&self) -> impl Iterator<Item = &TaskRef> {
    self.order.iter().map(|idx| &self.graph[*idx])
  }

  /// Projects owning at least one task of the graph.
  pub fn projects(&self) -> BTreeSet<ProjectRef> {
    self.graph.node_weights().map(|task| task.project.clone()).collect()
  }

  pub fn len(&self) -> usize {
    self.graph.node_count()
  }

  pub fn is_empty(&self) -> bool {
    self.graph.node_count() == 0
  }
}
