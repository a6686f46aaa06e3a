use std::sync::Arc;

use thiserror::Error;

/// A build failure shared by reference so that one instance can be recorded,
/// propagated through the driver and handed back to the host unchanged.
pub type SharedFailure = Arc<BuildFailure>;

/// Result type used by every build collaborator.
pub type BuildResult<T> = Result<T, SharedFailure>;

/// A failure raised by the build engine or by a client action.
#[derive(Debug, Error)]
pub enum BuildFailure {
  /// The build was aborted because cancellation was requested.
  #[error("{message}")]
  Cancelled { message: String },

  /// Any other failure, optionally caused by another one.
  #[error("{message}")]
  Failed {
    message: String,
    #[source]
    cause: Option<SharedFailure>,
  },
}

impl BuildFailure {
  pub fn cancelled(message: impl Into<String>) -> SharedFailure {
    Arc::new(BuildFailure::Cancelled {
      message: message.into(),
    })
  }

  pub fn failed(message: impl Into<String>) -> SharedFailure {
    Arc::new(BuildFailure::Failed {
      message: message.into(),
      cause: None,
    })
  }

  pub fn caused_by(message: impl Into<String>, cause: SharedFailure) -> SharedFailure {
    Arc::new(BuildFailure::Failed {
      message: message.into(),
      cause: Some(cause),
    })
  }

  /// True for cancellation-class failures.
  pub fn is_cancellation(&self) -> bool {
    matches!(self, BuildFailure::Cancelled { .. })
  }

  pub fn message(&self) -> &str {
    match self {
      BuildFailure::Cancelled { message } | BuildFailure::Failed { message, .. } => message,
    }
  }

  pub fn cause(&self) -> Option<&SharedFailure> {
    match self {
      BuildFailure::Cancelled { .. } => None,
      BuildFailure::Failed { cause, .. } => cause.as_ref(),
    }
  }

  /// Messages of the cause chain below this failure, outermost first.
  pub fn cause_messages(&self) -> Vec<String> {
    let mut messages = Vec::new();
    let mut current = self.cause();
    while let Some(failure) = current {
      messages.push(failure.message().to_string());
      current = failure.cause();
    }
    messages
  }
}
