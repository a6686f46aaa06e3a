use tracing::{info, warn};

use crate::action::ClientAction;
use crate::build::BuildController;
use crate::protocol::{BuildActionRequest, FailureCategory, RunResult};
use crate::serialize::PayloadSerializer;

use super::ProtocolError;
use super::listener::{ListenerOutcome, ResultBuildingListener};

/// Runs client-provided build actions against a build controller.
pub struct ClientProvidedBuildActionRunner<S> {
  serializer: S,
}

impl<S: PayloadSerializer> ClientProvidedBuildActionRunner<S> {
  pub fn new(serializer: S) -> Self {
    Self { serializer }
  }

  pub fn serializer(&self) -> &S {
    &self.serializer
  }

  /// Execute `request` once against `controller`.
  ///
  /// Build and action failures are reported inside the envelope, with the
  /// raw failure returned alongside it. Only serializer faults and broken
  /// collaborator contracts surface as [`ProtocolError`].
  pub fn run(
    &self,
    request: &BuildActionRequest,
    controller: &mut dyn BuildController,
  ) -> Result<RunResult, ProtocolError> {
    controller.start_parameter_mut().configure_on_demand = false;

    let object = self.serializer.deserialize_action(&request.action)?;
    let action = ClientAction::select(object.as_ref())
      .ok_or_else(|| ProtocolError::UnsupportedAction(object.type_name().to_string()))?;

    info!(
      action = object.type_name(),
      convention = ?action.convention(),
      run_tasks = request.run_tasks,
      "running client-provided build action"
    );

    let mut outcome = ListenerOutcome::default();
    let build_result = {
      let mut listener = ResultBuildingListener::new(action, &mut outcome);
      if request.run_tasks {
        controller.run(&mut listener)
      } else {
        controller.configure(&mut listener)
      }
    };

    let build_failure = build_result.err();
    if let Some(failure) = &build_failure {
      if failure.is_cancellation() {
        warn!(error = %failure, "build was cancelled");
      } else {
        warn!(error = %failure, "build failed");
      }
    }

    match FailureCategory::classify(build_failure.as_ref(), outcome.action_failure.as_ref()) {
      Some(category) => {
        info!(category = %category.kind(), "client action finished with failure");
        let descriptor = self.serializer.serialize_failure(&category.descriptor())?;
        Ok(RunResult::failed(descriptor, category.into_cause()))
      }
      None => {
        let model = outcome.model.ok_or(ProtocolError::ActionNotInvoked)?;
        let bytes = self.serializer.serialize_model(&model)?;
        info!(bytes = bytes.len(), "client action finished");
        Ok(RunResult::success(bytes))
      }
    }
  }
}
