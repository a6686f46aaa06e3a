//! Full configuration of the build tree before the action runs.

use std::collections::BTreeSet;

use buildact_lib::action::ActionConvention;
use buildact_lib::build::{
  BUILD_MODEL, BuildController, BuildId, BuildListener, BuildResult, BuildTree, CancellationToken, Model,
  ModelProvider, ModelTarget, ProjectPath, ProjectRef, SharedFailure,
};
use buildact_lib::engine::{BuildDescription, EngineState};
use buildact_lib::runner::force_full_configuration;
use buildact_lib::serialize::ActionPayload;
use serde_json::json;

use super::common::*;

struct NoopListener;

impl BuildListener for NoopListener {
  fn projects_evaluated(&mut self, _build: &mut dyn BuildTree) -> BuildResult<()> {
    Ok(())
  }

  fn build_finished(&mut self, _failure: Option<&SharedFailure>, _build: &dyn BuildTree) -> BuildResult<()> {
    Ok(())
  }
}

fn project(build: &str, path: &str) -> ProjectRef {
  ProjectRef::new(BuildId::new(build), ProjectPath::parse(path).unwrap())
}

#[test]
fn engine_alone_leaves_included_builds_unconfigured() {
  let mut build = engine();
  build.start_parameter_mut().configure_on_demand = false;

  build.configure(&mut NoopListener).unwrap();

  assert!(build.state().is_configured(&project("app", ":docs")));
  assert!(!build.state().is_configured(&project("plugins", ":core")));
  assert!(!build.state().is_configured(&project("tooling", ":")));
}

#[test]
fn every_project_is_configured_exactly_once() {
  let runner = runner();
  let mut build = engine();
  let payload = ActionPayload::new("constant").with_params(json!({ "value": null }));

  let result = runner.run(&request(payload, false), &mut build).unwrap();

  assert!(result.result.is_success());
  let log = build.state().configuration_log();
  let distinct: BTreeSet<&ProjectRef> = log.iter().collect();
  assert_eq!(log.len(), TREE_PROJECTS);
  assert_eq!(distinct.len(), TREE_PROJECTS);
}

#[test]
fn root_build_is_configured_before_included_builds() {
  let runner = runner();
  let mut build = engine();
  let payload = ActionPayload::new("constant").with_params(json!({ "value": 0 }));

  runner.run(&request(payload, false), &mut build).unwrap();

  let builds: Vec<&str> = build
    .state()
    .configuration_log()
    .iter()
    .map(|p| p.build.as_str())
    .collect();
  assert_eq!(builds, vec!["app", "app", "app", "plugins", "plugins", "tooling"]);
}

#[test]
fn legacy_action_sees_every_reachable_build() {
  let runner = runner();
  let payload = ActionPayload::new("project-paths").with_convention(ActionConvention::Legacy);

  let result = runner.run(&request(payload, false), &mut engine()).unwrap();

  assert_eq!(
    decode_model(&runner, &result),
    json!({
      "app": [":", ":docs", ":lib"],
      "plugins": [":", ":core"],
      "tooling": [":"],
    })
  );
}

#[test]
fn configure_on_demand_is_overridden_for_the_request() {
  let runner = runner();
  let mut build = engine();
  assert!(build.start_parameter().configure_on_demand);
  build.start_parameter_mut().task_names = vec![":lib:jar".to_string()];
  let payload = ActionPayload::new("project-property").with_params(json!({ "project": ":", "property": "group" }));

  let result = runner.run(&request(payload, true), &mut build).unwrap();

  assert_eq!(decode_model(&runner, &result), json!("org.example"));
  assert!(!build.start_parameter().configure_on_demand);
  assert!(build.state().is_configured(&project("app", ":docs")));
}

fn build_models(state: &EngineState) -> Vec<Model> {
  ["app", "plugins", "tooling"]
    .iter()
    .map(|name| {
      state
        .get_model(&ModelTarget::Build(BuildId::new(*name)), BUILD_MODEL, None)
        .unwrap()
    })
    .collect()
}

#[test]
fn forcing_twice_has_no_further_effect() {
  let mut state = EngineState::new(BuildDescription::from_json(TREE).unwrap(), CancellationToken::new()).unwrap();

  force_full_configuration(&mut state).unwrap();
  let log = state.configuration_log().to_vec();
  let models = build_models(&state);

  force_full_configuration(&mut state).unwrap();

  assert_eq!(log.len(), TREE_PROJECTS);
  assert_eq!(state.configuration_log(), log.as_slice());
  assert_eq!(build_models(&state), models);
}
