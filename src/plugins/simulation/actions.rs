//! Action handlers for simulation commands
//!
//! This module contains handlers for SimulationCommand events: pause/resume
//! and runtime integrator swaps.

use crate::config::IntegratorsConfig;
use crate::physics::components::{AngularDynamics, LinearDynamics};
use crate::prelude::*;

pub fn handle_toggle_pause_simulation_event(
    mut commands_reader: EventReader<SimulationCommand>,
    mut physics_time: ResMut<PhysicsTime>,
) {
    for command in commands_reader.read() {
        if !matches!(command, SimulationCommand::TogglePause) {
            continue;
        }
        if physics_time.is_paused() {
            physics_time.unpause();
            info!("Simulation resumed at step {}", physics_time.steps);
        } else {
            physics_time.pause();
            info!("Simulation paused at step {}", physics_time.steps);
        }
    }
}

pub fn handle_set_integrators_event(
    mut commands_reader: EventReader<SimulationCommand>,
    mut linear_bodies: Query<&mut LinearDynamics>,
    mut angular_bodies: Query<&mut AngularDynamics>,
    mut config: ResMut<SimulationConfig>,
) {
    for command in commands_reader.read() {
        let SimulationCommand::SetIntegrators(kind) = *command else {
            continue;
        };

        for mut linear in linear_bodies.iter_mut() {
            linear.set_integrators(kind);
        }
        for mut angular in angular_bodies.iter_mut() {
            angular.set_integrators(kind);
        }
        config.integrators = IntegratorsConfig::uniform(kind);
        info!("Switched all integrators to {kind}");
    }
}
