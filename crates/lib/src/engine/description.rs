//! Declarative description of a build tree.
//!
//! ```json
//! {
//!   "root": "app",
//!   "builds": {
//!     "app": {
//!       "includes": ["plugins"],
//!       "projects": {
//!         ":": { "tasks": { "build": { "depends_on": [":lib:jar"] } } },
//!         ":lib": { "properties": { "version": "1.0" }, "tasks": { "jar": {} } }
//!       }
//!     },
//!     "plugins": { "projects": { ":core": { "properties": { "group": "org.example" } } } }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::build::{BuildId, Model, ProjectPath};

use super::tasks::TaskRef;

/// Errors raised while loading or validating a build description.
#[derive(Debug, Error)]
pub enum DescriptionError {
  #[error("failed to read build description {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("invalid build description: {0}")]
  Parse(#[from] serde_json::Error),

  #[error("root build '{0}' is not defined")]
  UnknownRootBuild(String),

  #[error("build '{build}' includes unknown build '{included}'")]
  UnknownInclude { build: String, included: String },

  #[error("task '{task}' depends on '{dependency}': {reason}")]
  InvalidDependency {
    task: String,
    dependency: String,
    reason: String,
  },
}

/// A build tree: the root build and every build it may include.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildDescription {
  pub root: String,
  pub builds: BTreeMap<String, BuildSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildSpec {
  #[serde(default)]
  pub projects: BTreeMap<ProjectPath, ProjectSpec>,

  /// Names of included builds, in declaration order.
  #[serde(default)]
  pub includes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectSpec {
  #[serde(default)]
  pub properties: BTreeMap<String, Model>,

  #[serde(default)]
  pub tasks: BTreeMap<String, TaskSpec>,

  /// Configuring the project fails with this message.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub evaluation_failure: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskSpec {
  /// Task references, `[build/]:project:task`, resolved against the owning build.
  #[serde(default)]
  pub depends_on: Vec<String>,

  /// Executing the task fails with this message.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub failure: Option<String>,
}

impl BuildDescription {
  /// Read and validate a description from a JSON file.
  pub fn load(path: &Path) -> Result<Self, DescriptionError> {
    let content = fs::read_to_string(path).map_err(|source| DescriptionError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    Self::from_json(&content)
  }

  /// Parse and validate a description from a JSON string.
  pub fn from_json(content: &str) -> Result<Self, DescriptionError> {
    let description: BuildDescription = serde_json::from_str(content)?;
    description.validate()?;
    Ok(description)
  }

  /// Check that the root build exists, includes name known builds and task
  /// dependencies name known tasks.
  pub fn validate(&self) -> Result<(), DescriptionError> {
    if !self.builds.contains_key(&self.root) {
      return Err(DescriptionError::UnknownRootBuild(self.root.clone()));
    }

    for (name, build) in &self.builds {
      if let Some(included) = build.includes.iter().find(|i| !self.builds.contains_key(*i)) {
        return Err(DescriptionError::UnknownInclude {
          build: name.clone(),
          included: included.clone(),
        });
      }

      let build_id = BuildId::new(name.clone());
      for (path, project) in &build.projects {
        for (task_name, task) in &project.tasks {
          for dependency in &task.depends_on {
            let task_ref = format!("{}/{}", name, TaskRef::task_path(path, task_name));
            self.resolve_dependency(&build_id, dependency).map_err(|reason| {
              DescriptionError::InvalidDependency {
                task: task_ref,
                dependency: dependency.clone(),
                reason,
              }
            })?;
          }
        }
      }
    }

    Ok(())
  }

  /// Resolve a task reference written inside `build`.
  pub fn resolve_dependency(&self, build: &BuildId, dependency: &str) -> Result<TaskRef, String> {
    let task = TaskRef::parse(dependency, build).ok_or_else(|| "not a valid task reference".to_string())?;
    let exists = self
      .builds
      .get(task.project.build.as_str())
      .and_then(|b| b.projects.get(&task.project.path))
      .is_some_and(|p| p.tasks.contains_key(&task.name));
    if exists {
      Ok(task)
    } else {
      Err("no such task".to_string())
    }
  }
}
