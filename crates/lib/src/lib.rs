//! buildact-lib: client-provided build actions against a configured build
//!
//! A client sends a serialized action. The runner has a build engine configure
//! (and optionally run) the build, forces every project of every build in the
//! tree to be configured, invokes the action against the resulting models and
//! returns a uniform envelope holding either the model or a categorized failure.
//!
//! - `build`: engine contracts, build failures and the shared identity types
//! - `action`: client action shapes and the model-access surface handed to them
//! - `serialize`: the payload codec and the registry of action types
//! - `protocol`: request, envelope and failure classification
//! - `runner`: the lifecycle listener and the protocol entry point
//! - `engine`: an in-memory reference engine

pub mod action;
pub mod build;
pub mod engine;
pub mod protocol;
pub mod runner;
pub mod serialize;
