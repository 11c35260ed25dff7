//! Planeworld prelude module
//!
//! This module re-exports the most commonly used types, traits, and functions
//! across planeworld to reduce import boilerplate.

// External crate re-exports
pub use bevy::prelude::*;

// Internal re-exports - Config
pub use crate::config::SimulationConfig;

// Internal re-exports - Events
pub use crate::events::SimulationCommand;

// Internal re-exports - Physics
pub use crate::physics::components::{BodyBundle, RigidBodyBundle};
pub use crate::physics::kinematics::KinematicsState;
pub use crate::physics::math::{Scalar, Vector};
pub use crate::physics::resources::PhysicsTime;
pub use crate::physics::world_limit::WorldLimit;

// Internal re-exports - Plugins
pub use crate::plugins::simulation::SimulationPlugin;
