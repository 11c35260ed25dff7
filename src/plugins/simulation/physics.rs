use crate::physics::components::{
    AngularDynamics, ForceAccumulator, Inertia, LinearDynamics, Mass, TimeFactor,
};
use crate::physics::kinematics::KinematicsState;
use crate::physics::math::{Scalar, Vector};
use crate::physics::resources::PhysicsTime;
use crate::physics::world_limit::WorldLimit;
use bevy::prelude::*;

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum PhysicsSet {
    Integrate,
    ClearForces,
    SyncReferences,
}

/// Run condition for the physics step
pub fn physics_running(physics_time: Res<PhysicsTime>) -> bool {
    !physics_time.is_paused()
}

/// Advance every body by one fixed step and write the results into its
/// kinematics state.
pub fn integrate_bodies(
    mut bodies: Query<(
        Entity,
        &mut KinematicsState,
        &mut LinearDynamics,
        Option<(&mut AngularDynamics, &Inertia)>,
        &ForceAccumulator,
        &Mass,
        &TimeFactor,
    )>,
    physics_time: Res<PhysicsTime>,
    world_limit: Res<WorldLimit>,
) {
    let dt = physics_time.scaled_dt();
    let world_limit: &WorldLimit = &world_limit;

    bodies.par_iter_mut().for_each(
        |(entity, mut state, mut linear, angular, forces, mass, time_factor)| {
            let dt = dt * time_factor.value();

            match linear.step(forces.force() / mass.value(), dt) {
                Ok((position, velocity)) => {
                    let wrap = state.set_origin(position, world_limit);
                    if !world_limit.contains(state.local_origin()) {
                        warn!("Body {entity} moved more than one world width in a step");
                    }
                    if wrap != Vector::ZERO {
                        linear.shift_position(wrap);
                        debug!("Body {entity} wrapped at the world limit by {wrap}");
                    }
                    state.set_velocity(velocity);
                }
                Err(e) => {
                    error!("Body {entity}: {e}");
                    return;
                }
            }

            if let Some((mut angular, inertia)) = angular {
                let angle_acceleration: Scalar = forces.torque() / inertia.value();
                match angular.step(angle_acceleration, dt) {
                    Ok((angle, angle_velocity)) => {
                        state.set_angle(angle);
                        state.set_angle_velocity(angle_velocity);
                    }
                    Err(e) => error!("Body {entity}: {e}"),
                }
            }
        },
    );
}

pub fn clear_forces(mut forces: Query<&mut ForceAccumulator>) {
    for mut accumulator in forces.iter_mut() {
        accumulator.clear();
    }
}

/// Refresh each attached state's cached reference rotation from the live
/// reference angle.
pub fn sync_reference_caches(
    mut states: ParamSet<(
        Query<&KinematicsState>,
        Query<(Entity, &mut KinematicsState)>,
    )>,
) {
    let attached: Vec<(Entity, Entity)> = states
        .p1()
        .iter()
        .filter_map(|(entity, state)| state.reference().map(|reference| (entity, reference)))
        .collect();
    if attached.is_empty() {
        return;
    }

    let reference_angles: Vec<(Entity, Scalar)> = {
        let lookup = states.p0();
        attached
            .into_iter()
            .filter_map(|(entity, reference)| {
                let reference_state = lookup.get(reference).ok()?;
                Some((entity, reference_state.global_frame(&lookup).angle))
            })
            .collect()
    };

    let mut writable = states.p1();
    for (entity, angle) in reference_angles {
        if let Ok((_, mut state)) = writable.get_mut(entity) {
            // Skip change detection when nothing changed.
            if state.reference_cache().is_valid_for(angle) {
                continue;
            }
            state.refresh_reference_cache(angle);
        }
    }
}

pub fn count_step(mut physics_time: ResMut<PhysicsTime>) {
    physics_time.steps += 1;
}
