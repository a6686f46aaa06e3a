use serde::{Deserialize, Serialize};

use crate::build::SharedFailure;

/// Client-visible failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureKind {
  Cancelled,
  ActionFailed,
  BuildFailed,
}

impl std::fmt::Display for FailureKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let name = match self {
      FailureKind::Cancelled => "cancelled",
      FailureKind::ActionFailed => "action-failed",
      FailureKind::BuildFailed => "build-failed",
    };
    write!(f, "{}", name)
  }
}

/// Serializable description of a failure sent to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureDescriptor {
  #[serde(rename = "category")]
  pub kind: FailureKind,

  /// Message of the failure itself.
  pub message: String,

  /// Messages of the cause chain, outermost first.
  #[serde(default)]
  pub causes: Vec<String>,
}

/// The single category a failed request is reported under.
#[derive(Debug, Clone)]
pub enum FailureCategory {
  Cancelled(SharedFailure),
  ActionFailed(SharedFailure),
  BuildFailed(SharedFailure),
}

impl FailureCategory {
  /// Choose the category for a request.
  ///
  /// `build_failure` is what the driver invocation failed with; `action_failure`
  /// is what the client action failed with, if it ran. In priority order:
  ///
  /// 1. a non-cancellation action failure is [`ActionFailed`](Self::ActionFailed),
  ///    even when the driver reports the same fault
  /// 2. any cancellation failure is [`Cancelled`](Self::Cancelled)
  /// 3. any other driver failure is [`BuildFailed`](Self::BuildFailed)
  ///
  /// Returns `None` when neither failed.
  pub fn classify(build_failure: Option<&SharedFailure>, action_failure: Option<&SharedFailure>) -> Option<Self> {
    if let Some(failure) = action_failure.filter(|f| !f.is_cancellation()) {
      return Some(FailureCategory::ActionFailed(failure.clone()));
    }

    let cancellation = action_failure
      .into_iter()
      .chain(build_failure)
      .find(|f| f.is_cancellation());
    if let Some(failure) = cancellation {
      return Some(FailureCategory::Cancelled(failure.clone()));
    }

    build_failure.map(|failure| FailureCategory::BuildFailed(failure.clone()))
  }

  pub fn kind(&self) -> FailureKind {
    match self {
      FailureCategory::Cancelled(_) => FailureKind::Cancelled,
      FailureCategory::ActionFailed(_) => FailureKind::ActionFailed,
      FailureCategory::BuildFailed(_) => FailureKind::BuildFailed,
    }
  }

  pub fn cause(&self) -> &SharedFailure {
    match self {
      FailureCategory::Cancelled(failure)
      | FailureCategory::ActionFailed(failure)
      | FailureCategory::BuildFailed(failure) => failure,
    }
  }

  pub fn into_cause(self) -> SharedFailure {
    match self {
      FailureCategory::Cancelled(failure)
      | FailureCategory::ActionFailed(failure)
      | FailureCategory::BuildFailed(failure) => failure,
    }
  }

  pub fn descriptor(&self) -> FailureDescriptor {
    let cause = self.cause();
    FailureDescriptor {
      kind: self.kind(),
      message: cause.message().to_string(),
      causes: cause.cause_messages(),
    }
  }
}
