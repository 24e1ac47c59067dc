//! Integration test utilities for the challenge tracker
//!
//! Helpers for running end-to-end tests against the REST API of a server
//! spawned in-process.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
