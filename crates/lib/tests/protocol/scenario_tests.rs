//! The four reference request outcomes.

use std::sync::Arc;

use buildact_lib::build::{BuildFailure, BuildId, ProjectPath, ProjectRef};
use buildact_lib::protocol::FailureKind;
use buildact_lib::serialize::ActionPayload;
use serde_json::json;

use super::common::*;

#[test]
fn action_model_is_returned_on_success() {
  let runner = runner();
  let payload = ActionPayload::new("constant").with_params(json!({ "value": "OK" }));

  let result = runner.run(&request(payload, true), &mut engine()).unwrap();

  assert_eq!(decode_model(&runner, &result), json!("OK"));
  assert!(result.result.failure_bytes().is_none());
  assert!(result.failure.is_none());
}

#[test]
fn nested_build_models_are_readable_without_running_tasks() {
  let runner = runner();
  let payload = ActionPayload::new("project-property").with_params(json!({
    "build": "plugins",
    "project": ":core",
    "property": "group",
  }));
  let mut build = engine();

  let result = runner.run(&request(payload, false), &mut build).unwrap();

  assert_eq!(decode_model(&runner, &result), json!("org.example.plugins"));
  assert!(build.executed_tasks().is_empty());
  let core = ProjectRef::new(BuildId::new("plugins"), ProjectPath::parse(":core").unwrap());
  assert!(build.state().is_configured(&core));
}

#[test]
fn action_failure_is_reported_with_its_identity() {
  let failure = BuildFailure::failed("boom");
  let scripted = failure.clone();
  let runner = runner_with(move |registry| {
    register_scripted(registry, Err(scripted));
  });

  let result = runner
    .run(&request(ActionPayload::new("scripted"), true), &mut engine())
    .unwrap();

  let descriptor = decode_failure(&runner, &result);
  assert_eq!(descriptor.kind, FailureKind::ActionFailed);
  assert_eq!(descriptor.message, "boom");
  assert!(result.result.model_bytes().is_none());
  assert!(Arc::ptr_eq(result.failure.as_ref().unwrap(), &failure));
}

#[test]
fn build_failure_before_action_skips_the_action() {
  let tree = r#"{ "root": "app", "builds": { "app": { "projects": {
    ":": { "evaluation_failure": "could not parse build script" }
  } } } }"#;
  let mut calls = None;
  let runner = runner_with(|registry| {
    calls = Some(register_scripted(registry, Ok(json!("unused"))));
  });
  let calls = calls.unwrap();

  let result = runner
    .run(&request(ActionPayload::new("scripted"), true), &mut engine_from(tree))
    .unwrap();

  let descriptor = decode_failure(&runner, &result);
  assert_eq!(descriptor.kind, FailureKind::BuildFailed);
  assert_eq!(descriptor.message, "A problem occurred evaluating project 'app/:'.");
  assert_eq!(descriptor.causes, vec!["could not parse build script"]);
  assert_eq!(calls.get(), 0);
}

#[test]
fn loads_build_description_from_disk() {
  let env = TestEnv::with_build(TREE);
  let mut build = buildact_lib::engine::InMemoryBuild::load(&env.build_path).unwrap();
  let runner = runner();
  let payload = ActionPayload::new("project-property").with_params(json!({ "project": ":lib", "property": "version" }));

  let result = runner.run(&request(payload, false), &mut build).unwrap();

  assert_eq!(decode_model(&runner, &result), json!("1.0"));
}
