use std::collections::{BTreeSet, VecDeque};

use tracing::{debug, warn};

use crate::action::{ClientAction, DefaultBuildController};
use crate::build::{BuildListener, BuildResult, BuildTree, Model, ProjectRef, SharedFailure};

/// Force full configuration of every project in every build of the tree.
///
/// Walks the root build and, transitively, every included build. Each build
/// is visited once even when several builds include it or includes form a
/// cycle. Projects that are already configured are skipped by the configurer,
/// so repeated calls have no further effect.
pub fn force_full_configuration(tree: &mut dyn BuildTree) -> BuildResult<()> {
  let root = tree.root_build();
  let mut visited = BTreeSet::from([root.clone()]);
  let mut pending = VecDeque::from([root]);

  while let Some(build) = pending.pop_front() {
    debug!(build = %build, "forcing full configuration");
    tree
      .project_configurer()
      .configure_hierarchy_fully(&ProjectRef::root(build.clone()))?;

    for included in tree.included_builds(&build)? {
      if visited.insert(included.clone()) {
        pending.push_back(included);
      }
    }
  }

  debug!(builds = visited.len(), "build tree fully configured");
  Ok(())
}

/// What the listener observed, read once after the driver returns.
#[derive(Debug, Default)]
pub struct ListenerOutcome {
  /// Model returned by the action, not yet serialized.
  pub model: Option<Model>,

  /// Failure raised by the action.
  pub action_failure: Option<SharedFailure>,
}

/// Lifecycle listener that configures the whole tree and then runs the client action.
pub struct ResultBuildingListener<'a> {
  action: ClientAction<'a>,
  outcome: &'a mut ListenerOutcome,
}

impl<'a> ResultBuildingListener<'a> {
  pub fn new(action: ClientAction<'a>, outcome: &'a mut ListenerOutcome) -> Self {
    Self { action, outcome }
  }
}

impl BuildListener for ResultBuildingListener<'_> {
  fn projects_evaluated(&mut self, build: &mut dyn BuildTree) -> BuildResult<()> {
    force_full_configuration(build)
  }

  fn build_finished(&mut self, failure: Option<&SharedFailure>, build: &dyn BuildTree) -> BuildResult<()> {
    if let Some(failure) = failure {
      debug!(error = %failure, "build failed, skipping client action");
      return Ok(());
    }

    let controller = DefaultBuildController::new(build.models(), build.root_build());
    debug!(convention = ?self.action.convention(), "invoking client action");
    match self.action.execute(&controller) {
      Ok(model) => {
        self.outcome.model = Some(model);
        Ok(())
      }
      Err(failure) => {
        warn!(error = %failure, "client action failed");
        self.outcome.action_failure = Some(failure.clone());
        Err(failure)
      }
    }
  }
}
