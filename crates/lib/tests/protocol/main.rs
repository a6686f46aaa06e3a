//! End-to-end protocol tests against the in-memory engine.

mod common;
mod configuration_tests;
mod failure_tests;
mod scenario_tests;
