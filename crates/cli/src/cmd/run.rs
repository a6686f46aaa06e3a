//! Run command implementation.
//!
//! Loads a build description and an action payload, runs one request through
//! the protocol and prints the resulting envelope.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde_json::json;
use tracing::debug;

use buildact_lib::build::BuildController;
use buildact_lib::engine::InMemoryBuild;
use buildact_lib::protocol::{BuildActionRequest, BuildActionResult};
use buildact_lib::runner::ClientProvidedBuildActionRunner;
use buildact_lib::serialize::{JsonPayloadSerializer, PayloadSerializer, SerializedPayload};

use crate::output::{OutputFormat, failure_line, print_error, print_json, print_stat, print_success};

pub struct RunArgs {
  pub build: PathBuf,
  pub action: PathBuf,
  pub configure_only: bool,
  pub tasks: Vec<String>,
  pub format: OutputFormat,
}

/// Returns whether the envelope holds a model.
pub fn cmd_run(args: &RunArgs) -> Result<bool> {
  let mut build = InMemoryBuild::load(&args.build)
    .with_context(|| format!("Failed to load build description {}", args.build.display()))?;
  build.start_parameter_mut().task_names = args.tasks.clone();

  let action = fs::read(&args.action)
    .with_context(|| format!("Failed to read action payload {}", args.action.display()))?;
  let request = BuildActionRequest::new(SerializedPayload::from(action), !args.configure_only);

  let runner = ClientProvidedBuildActionRunner::new(JsonPayloadSerializer::default());
  let outcome = runner
    .run(&request, &mut build)
    .context("Failed to run build action")?;
  debug!(tasks = build.executed_tasks().len(), "request complete");

  let serializer = runner.serializer();
  match &outcome.result {
    BuildActionResult::Model(bytes) => {
      let model = serializer.deserialize_model(bytes).context("Failed to decode model")?;
      if args.format.is_json() {
        print_json(&json!({ "model": model }))?;
      } else {
        let rendered = serde_json::to_string(&model).context("Failed to render model")?;
        print_success(&format!("model: {}", rendered));
      }
      Ok(true)
    }
    BuildActionResult::Failure(bytes) => {
      let descriptor = serializer
        .deserialize_failure(bytes)
        .context("Failed to decode failure")?;
      if args.format.is_json() {
        print_json(&json!({ "failure": descriptor }))?;
      } else {
        print_error(&failure_line(&descriptor));
        for cause in &descriptor.causes {
          print_stat("caused by", cause);
        }
      }
      Ok(false)
    }
  }
}
