//! Build engine contracts.
//!
//! The protocol never evaluates projects or executes tasks itself. It talks to
//! a build engine through the traits in this module:
//!
//! - [`BuildController`] - runs or configures one build invocation
//! - [`BuildListener`] - lifecycle hooks the controller fires
//! - [`BuildTree`] - the hook's view of the root build and its included builds
//! - [`ProjectConfigurer`] - forces configuration of a project hierarchy
//! - [`ModelProvider`] - read access to configured models

mod controller;
mod failure;
mod types;

pub use controller::*;
pub use failure::*;
pub use types::*;
