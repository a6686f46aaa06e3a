use serde::{Deserialize, Serialize};

use crate::action::controller::DefaultBuildController;
use crate::build::{BuildResult, Model, ModelTarget};

/// Model-access surface offered to legacy actions.
pub trait InternalBuildController {
  /// The build-level model of the root build.
  fn build_model(&self) -> BuildResult<Model>;

  fn get_model(&self, target: &ModelTarget, name: &str) -> BuildResult<Model>;
}

/// Model-access surface offered to current actions.
pub trait InternalBuildControllerV2: InternalBuildController {
  fn get_model_with_parameter(&self, target: &ModelTarget, name: &str, parameter: &Model) -> BuildResult<Model>;

  fn cancellation_requested(&self) -> bool;
}

/// A client action written against the legacy calling convention.
pub trait InternalBuildAction {
  fn execute(&self, controller: &dyn InternalBuildController) -> BuildResult<Model>;
}

/// A client action written against the current calling convention.
pub trait InternalBuildActionV2 {
  fn execute(&self, controller: &dyn InternalBuildControllerV2) -> BuildResult<Model>;
}

/// A deserialized client action object.
///
/// An object advertises which calling conventions it supports. The protocol
/// prefers the current convention when both are present.
pub trait ActionObject {
  /// Registered type name, used in diagnostics.
  fn type_name(&self) -> &str;

  fn as_current(&self) -> Option<&dyn InternalBuildActionV2> {
    None
  }

  fn as_legacy(&self) -> Option<&dyn InternalBuildAction> {
    None
  }
}

/// Calling convention requested by an action payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionConvention {
  Legacy,
  Current,
}

impl ActionConvention {
  pub const LEGACY_VERSION: u32 = 1;
  pub const CURRENT_VERSION: u32 = 2;

  pub fn from_version(version: u32) -> Option<Self> {
    match version {
      Self::LEGACY_VERSION => Some(ActionConvention::Legacy),
      Self::CURRENT_VERSION => Some(ActionConvention::Current),
      _ => None,
    }
  }

  pub fn version(self) -> u32 {
    match self {
      ActionConvention::Legacy => Self::LEGACY_VERSION,
      ActionConvention::Current => Self::CURRENT_VERSION,
    }
  }
}

/// A client action with exactly one calling convention selected.
#[derive(Clone, Copy)]
pub enum ClientAction<'a> {
  Legacy(&'a dyn InternalBuildAction),
  Current(&'a dyn InternalBuildActionV2),
}

impl<'a> ClientAction<'a> {
  /// Select the calling convention `object` supports.
  ///
  /// Returns `None` when the object supports neither convention.
  pub fn select(object: &'a dyn ActionObject) -> Option<Self> {
    if let Some(action) = object.as_current() {
      return Some(ClientAction::Current(action));
    }
    object.as_legacy().map(ClientAction::Legacy)
  }

  pub fn convention(&self) -> ActionConvention {
    match self {
      ClientAction::Legacy(_) => ActionConvention::Legacy,
      ClientAction::Current(_) => ActionConvention::Current,
    }
  }

  /// Invoke the action once against `controller`.
  pub fn execute(&self, controller: &DefaultBuildController<'_>) -> BuildResult<Model> {
    match self {
      ClientAction::Legacy(action) => action.execute(controller),
      ClientAction::Current(action) => action.execute(controller),
    }
  }
}

impl std::fmt::Debug for ClientAction<'_> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "ClientAction::{:?}", self.convention())
  }
}
