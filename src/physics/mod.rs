//! Physics core: integrators, reference-frame kinematics and the body
//! components that tie them into the ECS.

pub mod components;
pub mod integrators;
pub mod kinematics;
pub mod math;
pub mod resources;
pub mod snapshot;
pub mod world_limit;
