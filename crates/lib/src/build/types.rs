use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

/// Identity of a build in the build tree (the root build or an included build).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BuildId(pub String);

impl BuildId {
  pub fn new(name: impl Into<String>) -> Self {
    Self(name.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for BuildId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Colon-separated path of a project within its build.
///
/// The root project is `:`; children are `:app`, `:libs:core` and so on.
/// Ancestors always sort before their descendants.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectPath(String);

impl ProjectPath {
  pub const SEPARATOR: char = ':';

  pub fn root() -> Self {
    Self(":".to_string())
  }

  /// Parse a project path. Returns `None` unless the path starts with `:`
  /// and has no empty segments.
  pub fn parse(path: &str) -> Option<Self> {
    if path == ":" {
      return Some(Self::root());
    }
    let rest = path.strip_prefix(Self::SEPARATOR)?;
    if rest.split(Self::SEPARATOR).any(|segment| segment.is_empty()) {
      return None;
    }
    Some(Self(path.to_string()))
  }

  pub fn is_root(&self) -> bool {
    self.0 == ":"
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn parent(&self) -> Option<ProjectPath> {
    if self.is_root() {
      return None;
    }
    match self.0.rfind(Self::SEPARATOR) {
      Some(0) | None => Some(Self::root()),
      Some(idx) => Some(Self(self.0[..idx].to_string())),
    }
  }

  /// Returns every ancestor of this path, root first, excluding the path itself.
  pub fn ancestors(&self) -> Vec<ProjectPath> {
    let mut ancestors = Vec::new();
    let mut current = self.parent();
    while let Some(path) = current {
      current = path.parent();
      ancestors.push(path);
    }
    ancestors.reverse();
    ancestors
  }

  /// True if `self` is `other` or lies below it in the hierarchy.
  pub fn is_within(&self, other: &ProjectPath) -> bool {
    if other.is_root() || self == other {
      return true;
    }
    self
      .0
      .strip_prefix(&other.0)
      .is_some_and(|rest| rest.starts_with(Self::SEPARATOR))
  }
}

impl fmt::Display for ProjectPath {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl TryFrom<String> for ProjectPath {
  type Error = String;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    ProjectPath::parse(&value).ok_or_else(|| format!("invalid project path '{}'", value))
  }
}

impl From<ProjectPath> for String {
  fn from(path: ProjectPath) -> Self {
    path.0
  }
}

/// A project qualified by the build that owns it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProjectRef {
  pub build: BuildId,
  pub path: ProjectPath,
}

impl ProjectRef {
  pub fn new(build: BuildId, path: ProjectPath) -> Self {
    Self { build, path }
  }

  /// The root project of `build`.
  pub fn root(build: BuildId) -> Self {
    Self {
      build,
      path: ProjectPath::root(),
    }
  }
}

impl fmt::Display for ProjectRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{}", self.build, self.path)
  }
}

/// What a model query is addressed to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelTarget {
  Build(BuildId),
  Project(ProjectRef),
}

impl fmt::Display for ModelTarget {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ModelTarget::Build(id) => write!(f, "build '{}'", id),
      ModelTarget::Project(project) => write!(f, "project '{}'", project),
    }
  }
}

/// Engine settings for a single build invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartParameter {
  /// Configure only the projects needed by the requested tasks.
  pub configure_on_demand: bool,

  /// Requested task paths, resolved against the root build.
  pub task_names: Vec<String>,
}

impl Default for StartParameter {
  fn default() -> Self {
    Self {
      configure_on_demand: true,
      task_names: Vec::new(),
    }
  }
}

/// Cooperative cancellation flag shared between a build and whoever may cancel it.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn cancel(&self) {
    self.0.store(true, Ordering::SeqCst);
  }

  pub fn is_cancellation_requested(&self) -> bool {
    self.0.load(Ordering::SeqCst)
  }
}
