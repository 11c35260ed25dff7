//! Full body state for exact save and resume
//!
//! Unlike the kinematics text record, a snapshot keeps the integrators with
//! their derivative history, so a resumed body continues with the same
//! higher-order steps instead of bootstrapping again.

use crate::physics::components::{
    AngularDynamics, BodyBundle, ForceAccumulator, Inertia, LinearDynamics, Mass, TimeFactor,
};
use crate::physics::kinematics::{Frame, KinematicsState};
use crate::physics::world_limit::WorldLimit;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] toml::ser::Error),
    #[error("failed to decode snapshot: {0}")]
    Decode(#[from] toml::de::Error),
    #[error("snapshot reference {0} cannot be resolved")]
    UnresolvedReference(u64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodySnapshot {
    /// Stable id of the referenced body, if attached
    pub reference: Option<u64>,
    pub kinematics: Frame,
    pub mass: Mass,
    pub time_factor: TimeFactor,
    pub linear: LinearDynamics,
    pub inertia: Option<Inertia>,
    pub angular: Option<AngularDynamics>,
}

/// A body snapshot under the id other bodies refer to it by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedBody {
    pub id: u64,
    pub body: BodySnapshot,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub bodies: Vec<SavedBody>,
}

impl BodySnapshot {
    pub fn capture(
        state: &KinematicsState,
        linear: &LinearDynamics,
        mass: Mass,
        time_factor: TimeFactor,
        angular: Option<(&AngularDynamics, Inertia)>,
    ) -> Self {
        Self {
            reference: state.reference().map(Entity::to_bits),
            kinematics: state.local_frame(),
            mass,
            time_factor,
            linear: linear.clone(),
            inertia: angular.map(|(_, inertia)| inertia),
            angular: angular.map(|(dynamics, _)| dynamics.clone()),
        }
    }

    pub fn to_toml(&self) -> Result<String, SnapshotError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn from_toml(text: &str) -> Result<Self, SnapshotError> {
        Ok(toml::from_str(text)?)
    }
}

impl WorldSnapshot {
    /// Capture every body in `world`, keyed by entity bits.
    pub fn capture(world: &mut World) -> Self {
        let mut query = world.query::<(
            Entity,
            &KinematicsState,
            &LinearDynamics,
            &Mass,
            &TimeFactor,
            Option<(&AngularDynamics, &Inertia)>,
        )>();
        let mut bodies: Vec<SavedBody> = query
            .iter(world)
            .map(|(entity, state, linear, mass, time_factor, angular)| {
                let angular = angular.map(|(dynamics, inertia)| (dynamics, *inertia));
                SavedBody {
                    id: entity.to_bits(),
                    body: BodySnapshot::capture(state, linear, *mass, *time_factor, angular),
                }
            })
            .collect();
        bodies.sort_by_key(|saved| saved.id);
        Self { bodies }
    }

    /// Spawn all bodies into `world`, relinking references between them.
    ///
    /// Every reference is resolved against the snapshot before anything is
    /// spawned, so a failed restore leaves `world` untouched. Returns the new
    /// entities in snapshot order.
    pub fn restore(
        &self,
        world: &mut World,
        limit: &WorldLimit,
    ) -> Result<Vec<Entity>, SnapshotError> {
        let index_of: HashMap<u64, usize> = self
            .bodies
            .iter()
            .enumerate()
            .map(|(index, saved)| (saved.id, index))
            .collect();
        let reference_indices = self
            .bodies
            .iter()
            .map(|SavedBody { body, .. }| match body.reference {
                Some(id) => index_of
                    .get(&id)
                    .copied()
                    .map(Some)
                    .ok_or(SnapshotError::UnresolvedReference(id)),
                None => Ok(None),
            })
            .collect::<Result<Vec<Option<usize>>, SnapshotError>>()?;

        let entities: Vec<Entity> = self.bodies.iter().map(|_| world.spawn_empty().id()).collect();
        for ((SavedBody { body, .. }, &entity), reference) in
            self.bodies.iter().zip(&entities).zip(reference_indices)
        {
            let mut state = KinematicsState::from_frame(body.kinematics, limit);
            state.set_reference(reference.map(|index| entities[index]));
            let mut entity = world.entity_mut(entity);
            entity.insert(BodyBundle {
                kinematics: state,
                linear: body.linear.clone(),
                mass: body.mass,
                forces: ForceAccumulator::default(),
                time_factor: body.time_factor,
            });
            if let (Some(angular), Some(inertia)) = (&body.angular, body.inertia) {
                entity.insert((angular.clone(), inertia));
            }
        }
        Ok(entities)
    }

    pub fn to_toml(&self) -> Result<String, SnapshotError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn from_toml(text: &str) -> Result<Self, SnapshotError> {
        Ok(toml::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IntegratorsConfig;
    use crate::physics::components::RigidBodyBundle;
    use crate::physics::integrators::{Integrator, IntegratorKind};
    use crate::physics::math::Vector;

    #[test]
    fn test_body_snapshot_toml_keeps_history() {
        let state = KinematicsState::new()
            .with_origin(Vector::new(1.0, 2.0), &WorldLimit::default())
            .with_angle_velocity(0.5);
        let bundle = RigidBodyBundle::new(state, 3.0, 4.0, &IntegratorsConfig::default());
        let mut linear = bundle.body.linear.clone();
        for _ in 0..3 {
            linear.step(Vector::new(0.0, -9.81), 0.1).unwrap();
        }

        let snapshot = BodySnapshot::capture(
            &bundle.body.kinematics,
            &linear,
            bundle.body.mass,
            bundle.body.time_factor,
            Some((&bundle.angular, bundle.inertia)),
        );
        let text = snapshot.to_toml().unwrap();
        let restored = BodySnapshot::from_toml(&text).unwrap();
        assert_eq!(restored, snapshot);

        let mut original = linear.clone();
        let mut resumed = restored.linear.clone();
        assert_eq!(
            original.step(Vector::new(1.0, 0.0), 0.1).unwrap(),
            resumed.step(Vector::new(1.0, 0.0), 0.1).unwrap()
        );
        assert_eq!(resumed.velocity().value(), original.velocity().value());
    }

    #[test]
    fn test_world_snapshot_relinks_references() {
        let integrators = IntegratorsConfig::default();
        let mut world = World::new();
        let planet = world
            .spawn(RigidBodyBundle::new(
                KinematicsState::new().with_angle_velocity(0.1),
                100.0,
                10.0,
                &integrators,
            ))
            .id();
        let building = world
            .spawn(BodyBundle::point_mass(
                KinematicsState::new()
                    .with_origin(Vector::new(0.0, 5.0), &WorldLimit::default())
                    .with_reference(planet),
                1.0,
                &integrators,
            ))
            .id();

        let text = WorldSnapshot::capture(&mut world).to_toml().unwrap();
        let snapshot = WorldSnapshot::from_toml(&text).unwrap();

        let mut restored_world = World::new();
        let entities = snapshot
            .restore(&mut restored_world, &WorldLimit::default())
            .unwrap();
        assert_eq!(entities.len(), 2);

        let position = |id: Entity| {
            snapshot
                .bodies
                .iter()
                .position(|saved| saved.id == id.to_bits())
                .unwrap()
        };
        let new_planet = entities[position(planet)];
        let new_building = entities[position(building)];

        let state = restored_world.get::<KinematicsState>(new_building).unwrap();
        assert_eq!(state.reference(), Some(new_planet));
        assert!(restored_world.get::<AngularDynamics>(new_planet).is_some());
        assert!(restored_world.get::<AngularDynamics>(new_building).is_none());
    }

    fn saved_point_mass(id: u64, reference: Option<u64>) -> SavedBody {
        SavedBody {
            id,
            body: BodySnapshot {
                reference,
                kinematics: Frame::IDENTITY,
                mass: Mass::new(1.0),
                time_factor: TimeFactor::default(),
                linear: LinearDynamics::new(
                    IntegratorKind::Euler,
                    IntegratorKind::Euler,
                    &KinematicsState::new(),
                ),
                inertia: None,
                angular: None,
            },
        }
    }

    #[test]
    fn test_unresolved_reference_fails_without_spawning() {
        let snapshot = WorldSnapshot {
            bodies: vec![saved_point_mass(1, None), saved_point_mass(2, Some(99))],
        };

        let mut world = World::new();
        world.spawn(Mass::new(5.0));
        let before = world.entities().len();

        assert!(matches!(
            snapshot.restore(&mut world, &WorldLimit::default()),
            Err(SnapshotError::UnresolvedReference(99))
        ));
        assert_eq!(world.entities().len(), before);
        assert_eq!(world.query::<&LinearDynamics>().iter(&world).count(), 0);
    }

    #[test]
    fn test_reference_to_later_body_is_relinked() {
        let snapshot = WorldSnapshot {
            bodies: vec![saved_point_mass(1, Some(2)), saved_point_mass(2, None)],
        };

        let mut world = World::new();
        let entities = snapshot.restore(&mut world, &WorldLimit::default()).unwrap();
        let state = world.get::<KinematicsState>(entities[0]).unwrap();
        assert_eq!(state.reference(), Some(entities[1]));
    }
}
