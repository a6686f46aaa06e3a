//! Shared helpers for protocol tests.

use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

use buildact_lib::action::{ActionObject, InternalBuildActionV2, InternalBuildControllerV2};
use buildact_lib::build::{BuildResult, Model, SharedFailure};
use buildact_lib::engine::{BuildDescription, InMemoryBuild};
use buildact_lib::protocol::{BuildActionRequest, FailureDescriptor, RunResult};
use buildact_lib::runner::ClientProvidedBuildActionRunner;
use buildact_lib::serialize::{ActionPayload, ActionRegistry, JsonPayloadSerializer, PayloadSerializer};
use tempfile::TempDir;

/// Root build `app` including `plugins`, which includes `tooling`, which
/// includes `plugins` again.
pub const TREE: &str = r#"{
  "root": "app",
  "builds": {
    "app": {
      "includes": ["plugins"],
      "projects": {
        ":": { "properties": { "group": "org.example" }, "tasks": { "build": { "depends_on": [":lib:jar"] } } },
        ":lib": { "properties": { "version": "1.0" }, "tasks": { "jar": {} } },
        ":docs": { "tasks": { "site": { "failure": "broken link" } } }
      }
    },
    "plugins": {
      "includes": ["tooling"],
      "projects": { ":core": { "properties": { "group": "org.example.plugins" } } }
    },
    "tooling": {
      "includes": ["plugins"],
      "projects": { ":": { "properties": { "kind": "tooling" } } }
    }
  }
}"#;

/// Number of projects in [`TREE`], implicit root projects included.
pub const TREE_PROJECTS: usize = 6;

pub type Runner = ClientProvidedBuildActionRunner<JsonPayloadSerializer>;

pub fn engine() -> InMemoryBuild {
  engine_from(TREE)
}

pub fn engine_from(json: &str) -> InMemoryBuild {
  InMemoryBuild::new(BuildDescription::from_json(json).unwrap()).unwrap()
}

pub fn runner() -> Runner {
  ClientProvidedBuildActionRunner::new(JsonPayloadSerializer::default())
}

/// Runner whose registry also holds `extra` action types.
pub fn runner_with(extra: impl FnOnce(&mut ActionRegistry)) -> Runner {
  let mut registry = ActionRegistry::with_builtins();
  extra(&mut registry);
  ClientProvidedBuildActionRunner::new(JsonPayloadSerializer::new(registry))
}

pub fn request(payload: ActionPayload, run_tasks: bool) -> BuildActionRequest {
  BuildActionRequest::new(JsonPayloadSerializer::encode_action(&payload).unwrap(), run_tasks)
}

pub fn decode_model(runner: &Runner, result: &RunResult) -> Model {
  let bytes = result.result.model_bytes().expect("expected a model envelope");
  runner.serializer().deserialize_model(bytes).unwrap()
}

pub fn decode_failure(runner: &Runner, result: &RunResult) -> FailureDescriptor {
  let bytes = result.result.failure_bytes().expect("expected a failure envelope");
  runner.serializer().deserialize_failure(bytes).unwrap()
}

/// Isolated directory holding a build description file.
pub struct TestEnv {
  _temp: TempDir,
  pub build_path: PathBuf,
}

impl TestEnv {
  pub fn with_build(content: &str) -> Self {
    let temp = TempDir::new().unwrap();
    let build_path = temp.path().join("build.json");
    std::fs::write(&build_path, content).unwrap();
    Self {
      _temp: temp,
      build_path,
    }
  }
}

/// Current-convention action counting its invocations and returning a fixed outcome.
pub struct ScriptedAction {
  pub calls: Rc<Cell<usize>>,
  pub outcome: BuildResult<Model>,
}

impl InternalBuildActionV2 for ScriptedAction {
  fn execute(&self, _controller: &dyn InternalBuildControllerV2) -> BuildResult<Model> {
    self.calls.set(self.calls.get() + 1);
    self.outcome.clone()
  }
}

impl ActionObject for ScriptedAction {
  fn type_name(&self) -> &str {
    "scripted"
  }

  fn as_current(&self) -> Option<&dyn InternalBuildActionV2> {
    Some(self)
  }
}

/// Register a `scripted` action type producing `outcome`; returns its call counter.
pub fn register_scripted(registry: &mut ActionRegistry, outcome: Result<Model, SharedFailure>) -> Rc<Cell<usize>> {
  let calls = Rc::new(Cell::new(0));
  let counter = calls.clone();
  registry.register("scripted", move |_convention, _params| {
    Ok(Box::new(ScriptedAction {
      calls: counter.clone(),
      outcome: outcome.clone(),
    }))
  });
  calls
}
