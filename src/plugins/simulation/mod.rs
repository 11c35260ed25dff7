//! Simulation plugin - Self-contained plugin pattern
//!
//! This plugin owns the fixed-step physics: integrating bodies, clearing
//! accumulated forces and keeping reference-frame caches current. The
//! configuration, world limit and timestep resources are installed here.

use crate::prelude::*;

mod actions;
mod physics;

use actions::{handle_set_integrators_event, handle_toggle_pause_simulation_event};
use bevy::ecs::schedule::{LogLevel, ScheduleBuildSettings};
pub use physics::{
    PhysicsSet, clear_forces, count_step, integrate_bodies, physics_running,
    sync_reference_caches,
};

use crate::physics::integrators::IntegratorRegistry;
use crate::physics::world_limit::WorldLimit;

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let config = app
            .world()
            .get_resource::<SimulationConfig>()
            .cloned()
            .unwrap_or_else(SimulationConfig::load_from_user_config);

        match toml::to_string_pretty(&config) {
            Ok(toml_string) => {
                debug!("=== Current Configuration (TOML) ===\n{}", toml_string);
                debug!("=== End Configuration ===");
            }
            Err(e) => {
                error!("Failed to serialize configuration to TOML: {}", e);
            }
        }

        let world_limit = config.world_limit().unwrap_or_else(|e| {
            warn!("{e}. Using the default world limit.");
            WorldLimit::default()
        });

        app.insert_resource(config.physics_time());
        app.insert_resource(world_limit);
        app.insert_resource(config);
        app.init_resource::<IntegratorRegistry>();

        app.add_event::<SimulationCommand>();

        app.edit_schedule(FixedUpdate, |schedule| {
            schedule.set_build_settings(ScheduleBuildSettings {
                ambiguity_detection: LogLevel::Warn,
                ..default()
            });
        });

        app.configure_sets(
            FixedUpdate,
            (
                PhysicsSet::Integrate,
                PhysicsSet::ClearForces,
                PhysicsSet::SyncReferences,
            )
                .chain()
                .run_if(physics_running),
        );

        app.add_systems(
            FixedUpdate,
            (
                integrate_bodies.in_set(PhysicsSet::Integrate),
                clear_forces.in_set(PhysicsSet::ClearForces),
                (sync_reference_caches, count_step)
                    .chain()
                    .in_set(PhysicsSet::SyncReferences),
            ),
        );
        app.add_systems(
            Update,
            (
                handle_toggle_pause_simulation_event,
                handle_set_integrators_event,
            )
                .chain(),
        );
    }
}
