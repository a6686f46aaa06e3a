//! Failure classification and protocol faults.

use std::sync::Arc;

use buildact_lib::action::{ActionConvention, ActionObject, InternalBuildActionV2, InternalBuildControllerV2};
use buildact_lib::build::{BuildController, BuildFailure, BuildId, BuildResult, CancellationToken, Model, ModelTarget};
use buildact_lib::engine::{BuildDescription, InMemoryBuild};
use buildact_lib::protocol::{BuildActionResult, FailureKind};
use buildact_lib::runner::ProtocolError;
use buildact_lib::serialize::ActionPayload;
use serde_json::json;

use super::common::*;

#[test]
fn task_failure_is_a_build_failure() {
  let runner = runner();
  let mut build = engine();
  build.start_parameter_mut().task_names = vec![":docs:site".to_string()];
  let payload = ActionPayload::new("constant").with_params(json!({ "value": 1 }));

  let result = runner.run(&request(payload, true), &mut build).unwrap();

  let descriptor = decode_failure(&runner, &result);
  assert_eq!(descriptor.kind, FailureKind::BuildFailed);
  assert_eq!(descriptor.message, "Execution failed for task 'app/:docs:site'.");
  assert_eq!(descriptor.causes, vec!["broken link"]);
}

#[test]
fn requested_tasks_run_before_the_action() {
  let runner = runner();
  let mut build = engine();
  build.start_parameter_mut().task_names = vec![":build".to_string()];
  let payload = ActionPayload::new("constant").with_params(json!({ "value": 1 }));

  let result = runner.run(&request(payload, true), &mut build).unwrap();

  assert!(result.result.is_success());
  let executed: Vec<String> = build.executed_tasks().iter().map(|t| t.to_string()).collect();
  assert_eq!(executed, vec!["app/:lib:jar", "app/:build"]);
}

#[test]
fn cancelled_build_reports_cancellation() {
  let token = CancellationToken::new();
  token.cancel();
  let mut build = InMemoryBuild::with_cancellation(BuildDescription::from_json(TREE).unwrap(), token).unwrap();
  let runner = runner();
  let payload = ActionPayload::new("constant").with_params(json!({ "value": 1 }));

  let result = runner.run(&request(payload, true), &mut build).unwrap();

  let descriptor = decode_failure(&runner, &result);
  assert_eq!(descriptor.kind, FailureKind::Cancelled);
  assert!(result.failure.unwrap().is_cancellation());
}

#[test]
fn cancellation_raised_by_action_is_not_an_action_failure() {
  let runner = runner();
  let payload = ActionPayload::new("fail").with_params(json!({ "message": "stop requested", "cancel": true }));

  let result = runner.run(&request(payload, false), &mut engine()).unwrap();

  let descriptor = decode_failure(&runner, &result);
  assert_eq!(descriptor.kind, FailureKind::Cancelled);
  assert_eq!(descriptor.message, "stop requested");
}

#[test]
fn model_queries_observe_cancellation() {
  let mut build = engine();
  let token = build.cancellation_token().clone();
  let runner = runner_with(move |registry| {
    registry.register("cancel-then-query", move |_convention, _params| {
      Ok(Box::new(CancelThenQuery(token.clone())))
    });
  });

  let result = runner
    .run(&request(ActionPayload::new("cancel-then-query"), false), &mut build)
    .unwrap();

  let descriptor = decode_failure(&runner, &result);
  assert_eq!(descriptor.kind, FailureKind::Cancelled);
  assert_eq!(descriptor.message, "Build cancelled while querying models.");
}

struct CancelThenQuery(CancellationToken);

impl InternalBuildActionV2 for CancelThenQuery {
  fn execute(&self, controller: &dyn InternalBuildControllerV2) -> BuildResult<Model> {
    self.0.cancel();
    assert!(controller.cancellation_requested());
    controller.get_model(&ModelTarget::Build(BuildId::new("app")), "build")
  }
}

impl ActionObject for CancelThenQuery {
  fn type_name(&self) -> &str {
    "cancel-then-query"
  }

  fn as_current(&self) -> Option<&dyn InternalBuildActionV2> {
    Some(self)
  }
}

#[test]
fn action_failure_propagated_by_the_engine_stays_an_action_failure() {
  let failure = BuildFailure::failed("action broke");
  let scripted = failure.clone();
  let runner = runner_with(move |registry| {
    register_scripted(registry, Err(scripted));
  });

  let result = runner
    .run(&request(ActionPayload::new("scripted"), false), &mut engine())
    .unwrap();

  let descriptor = decode_failure(&runner, &result);
  assert_eq!(descriptor.kind, FailureKind::ActionFailed);
  assert!(Arc::ptr_eq(&result.failure.unwrap(), &failure));
}

#[test]
fn missing_property_fails_the_action() {
  let runner = runner();
  let payload = ActionPayload::new("project-property").with_params(json!({ "project": ":lib", "property": "nope" }));

  let result = runner.run(&request(payload, false), &mut engine()).unwrap();

  let descriptor = decode_failure(&runner, &result);
  assert_eq!(descriptor.kind, FailureKind::ActionFailed);
  assert_eq!(descriptor.message, "Project 'app/:lib' has no property 'nope'.");
}

#[test]
fn action_without_usable_convention_is_rejected_before_the_build() {
  let runner = runner();
  let payload = ActionPayload::new("project-property")
    .with_params(json!({ "project": ":lib", "property": "version" }))
    .with_convention(ActionConvention::Legacy);
  let mut build = engine();

  let err = runner.run(&request(payload, false), &mut build).unwrap_err();

  assert!(matches!(err, ProtocolError::UnsupportedAction(name) if name == "project-property"));
  assert!(build.state().configuration_log().is_empty());
}

#[test]
fn invalid_params_are_a_protocol_fault() {
  let runner = runner();

  let err = runner
    .run(&request(ActionPayload::new("fail"), false), &mut engine())
    .unwrap_err();

  assert!(matches!(err, ProtocolError::Serialization(_)));
}

#[test]
fn envelope_carries_exactly_one_payload() {
  let runner = runner();
  let ok = runner
    .run(
      &request(ActionPayload::new("constant").with_params(json!({ "value": [1, 2] })), false),
      &mut engine(),
    )
    .unwrap();
  let failed = runner
    .run(
      &request(ActionPayload::new("fail").with_params(json!({ "message": "no" })), false),
      &mut engine(),
    )
    .unwrap();

  assert!(matches!(ok.result, BuildActionResult::Model(_)));
  assert!(matches!(failed.result, BuildActionResult::Failure(_)));

  let wire = serde_json::to_string(&failed.result).unwrap();
  let decoded: BuildActionResult = serde_json::from_str(&wire).unwrap();
  assert_eq!(decoded, failed.result);
  assert_eq!(decode_failure(&runner, &failed).message, "no");
}
