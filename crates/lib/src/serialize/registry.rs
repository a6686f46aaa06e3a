use std::collections::BTreeMap;

use tracing::debug;

use crate::action::{ActionConvention, ActionObject, actions};
use crate::build::Model;

use super::SerializeError;

/// Builds an action object from its requested convention and parameters.
pub type ActionFactory = Box<dyn Fn(ActionConvention, Model) -> Result<Box<dyn ActionObject>, SerializeError>>;

/// Maps action type names to the factories that construct them.
#[derive(Default)]
pub struct ActionRegistry {
  factories: BTreeMap<String, ActionFactory>,
}

impl ActionRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// A registry with every built-in action type registered.
  pub fn with_builtins() -> Self {
    let mut registry = Self::new();
    actions::register_builtins(&mut registry);
    registry
  }

  /// Register `factory` under `name`, replacing any previous registration.
  pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
  where
    F: Fn(ActionConvention, Model) -> Result<Box<dyn ActionObject>, SerializeError> + 'static,
  {
    let name = name.into();
    debug!(action = %name, "registering action type");
    self.factories.insert(name, Box::new(factory));
  }

  /// Registered type names, sorted.
  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.factories.keys().map(String::as_str)
  }

  pub fn create(
    &self,
    name: &str,
    convention: ActionConvention,
    params: Model,
  ) -> Result<Box<dyn ActionObject>, SerializeError> {
    let factory = self
      .factories
      .get(name)
      .ok_or_else(|| SerializeError::UnknownAction(name.to_string()))?;
    factory(convention, params)
  }
}

impl std::fmt::Debug for ActionRegistry {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ActionRegistry")
      .field("types", &self.factories.keys().collect::<Vec<_>>())
      .finish()
  }
}
