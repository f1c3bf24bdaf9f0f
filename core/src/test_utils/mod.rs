//! Test utilities
//!
//! Manual mock implementations and test fixtures for unit testing.
//!
//! Manual mocks rather than mockall: the port traits hand out live
//! subscriptions, and tests need to push into them and gate page results,
//! which is plain code here and awkward behind expectation macros.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
