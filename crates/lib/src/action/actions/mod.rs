//! Built-in action implementations.
//!
//! - [`constant`] - returns a fixed value
//! - [`fail`] - fails with a message, optionally as a cancellation
//! - [`project_paths`] - lists the projects of every reachable build
//! - [`project_property`] - reads one property through a parameterized model

pub mod constant;
pub mod fail;
pub mod project_paths;
pub mod project_property;

use serde::de::DeserializeOwned;

use crate::build::Model;
use crate::serialize::{ActionRegistry, SerializeError};

/// Register every built-in action type in `registry`.
pub fn register_builtins(registry: &mut ActionRegistry) {
  registry.register(constant::NAME, |convention, params| {
    Ok(Box::new(constant::ConstantAction::from_params(convention, params)?))
  });
  registry.register(fail::NAME, |convention, params| {
    Ok(Box::new(fail::FailAction::from_params(convention, params)?))
  });
  registry.register(project_paths::NAME, |convention, _params| {
    Ok(Box::new(project_paths::ProjectPathsAction::new(convention)))
  });
  registry.register(project_property::NAME, |convention, params| {
    Ok(Box::new(project_property::ProjectPropertyAction::from_params(
      convention, params,
    )?))
  });
}

/// Decode action parameters, reporting failures against the action type.
pub(crate) fn parse_params<T: DeserializeOwned>(kind: &str, params: Model) -> Result<T, SerializeError> {
  serde_json::from_value(params).map_err(|e| SerializeError::InvalidParams {
    kind: kind.to_string(),
    message: e.to_string(),
  })
}
