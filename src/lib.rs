//! Planeworld library
//!
//! Two-dimensional physics core: bodies whose kinematic state is expressed
//! relative to other bodies, advanced by single- and multi-step integrators.
//! Exposed as a library to enable integration testing.

pub mod cli;
pub mod config;
pub mod events;
pub mod physics;
pub mod plugins;
pub mod prelude;

// Test utilities are public for integration tests
pub mod test_utils;
