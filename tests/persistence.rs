//! Saving and restoring bodies: the kinematics text record and full
//! snapshots with integrator history.

use planeworld::config::SimulationConfig;
use planeworld::physics::components::{
    AngularDynamics, BodyBundle, LinearDynamics, RigidBodyBundle,
};
use planeworld::physics::integrators::Integrator;
use planeworld::physics::kinematics::{KinematicsRecord, KinematicsState};
use planeworld::physics::math::Vector;
use planeworld::physics::snapshot::WorldSnapshot;
use planeworld::physics::world_limit::WorldLimit;
use planeworld::test_utils::{create_test_app, step};

use bevy::prelude::{App, Entity, World};
use std::collections::HashMap;

fn spawn_planet_with_building(app: &mut App) -> (Entity, Entity) {
    let integrators = app.world().resource::<SimulationConfig>().integrators;
    let limit = *app.world().resource::<WorldLimit>();
    let world = app.world_mut();
    let planet = world
        .spawn(RigidBodyBundle::new(
            KinematicsState::new()
                .with_origin(Vector::new(-200.0, 30.0), &limit)
                .with_velocity(Vector::new(1.5, -0.5))
                .with_angle_velocity(0.2),
            1e6,
            1e7,
            &integrators,
        ))
        .id();
    let building = world
        .spawn(BodyBundle::point_mass(
            KinematicsState::new()
                .with_origin(Vector::new(0.0, 25.0), &limit)
                .with_velocity(Vector::new(0.1, 0.0))
                .with_reference(planet),
            10.0,
            &integrators,
        ))
        .id();
    (planet, building)
}

fn global_origin(world: &World, entity: Entity) -> Vector {
    world
        .get::<KinematicsState>(entity)
        .unwrap()
        .origin(world)
}

#[test]
fn test_records_restore_a_reference_chain() {
    let mut app = create_test_app(SimulationConfig::default());
    let (planet, building) = spawn_planet_with_building(&mut app);
    step(&mut app, 10);

    let world = app.world();
    let planet_text = KinematicsRecord::from_state(world.get(planet).unwrap()).to_string();
    let building_text = KinematicsRecord::from_state(world.get(building).unwrap()).to_string();
    let expected = global_origin(world, building);

    let planet_record: KinematicsRecord = planet_text.parse().unwrap();
    let building_record: KinematicsRecord = building_text.parse().unwrap();
    assert_eq!(building_record.reference, Some(planet.to_bits()));

    let limit = WorldLimit::default();
    let mut restored = World::new();
    let new_planet = restored
        .spawn(planet_record.to_state(&limit, |_| None).unwrap())
        .id();
    let ids = HashMap::from([(planet.to_bits(), new_planet)]);
    let new_building = restored
        .spawn(
            building_record
                .to_state(&limit, |id| ids.get(&id).copied())
                .unwrap(),
        )
        .id();

    assert_eq!(global_origin(&restored, new_building), expected);
}

#[test]
fn test_record_with_unknown_reference_is_rejected() {
    let record: KinematicsRecord = "KinematicsState:\n77\n1 2\n0 0\n0\n0\n".parse().unwrap();
    assert!(record.to_state(&WorldLimit::default(), |_| None).is_err());
}

#[test]
fn test_legacy_record_reports_limit_without_applying_it() {
    let text = "KinematicsState:\n0\n100 100\n150 -20\n1 0\n0.5\n0.25\n";
    let record: KinematicsRecord = text.parse().unwrap();

    assert_eq!(record.reference, None);
    assert_eq!(record.legacy_world_limit, Some((100.0, 100.0)));

    // Restored into the current, much larger world: nothing wraps.
    let state = record.to_state(&WorldLimit::default(), |_| None).unwrap();
    assert_eq!(state.local_origin(), Vector::new(150.0, -20.0));

    // Restored into the legacy world, the origin wraps.
    let (x, y) = record.legacy_world_limit.unwrap();
    let legacy = WorldLimit::new(x, y).unwrap();
    let state = record.to_state(&legacy, |_| None).unwrap();
    assert_eq!(state.local_origin(), Vector::new(-50.0, -20.0));
}

#[test]
fn test_snapshot_resumes_exactly() {
    let mut original = create_test_app(SimulationConfig::default());
    let (planet, building) = spawn_planet_with_building(&mut original);
    // Part-way through the multi-step warm-up.
    step(&mut original, 3);

    let text = WorldSnapshot::capture(original.world_mut()).to_toml().unwrap();
    let snapshot = WorldSnapshot::from_toml(&text).unwrap();

    let mut resumed = create_test_app(SimulationConfig::default());
    let limit = *resumed.world().resource::<WorldLimit>();
    let entities = snapshot.restore(resumed.world_mut(), &limit).unwrap();
    let index_of = |entity: Entity| {
        snapshot
            .bodies
            .iter()
            .position(|saved| saved.id == entity.to_bits())
            .unwrap()
    };
    let resumed_planet = entities[index_of(planet)];
    let resumed_building = entities[index_of(building)];

    step(&mut original, 20);
    step(&mut resumed, 20);

    assert_eq!(
        global_origin(original.world(), building),
        global_origin(resumed.world(), resumed_building)
    );
    assert_eq!(
        global_origin(original.world(), planet),
        global_origin(resumed.world(), resumed_planet)
    );

    let original_linear = original.world().get::<LinearDynamics>(planet).unwrap();
    let resumed_linear = resumed.world().get::<LinearDynamics>(resumed_planet).unwrap();
    assert_eq!(
        original_linear.velocity().prev_value(),
        resumed_linear.velocity().prev_value()
    );
}

#[test]
fn test_record_restart_loses_history() {
    // A record only carries the kinematics, so the restored body starts the
    // multi-step warm-up again and drifts from the original.
    let mut original = create_test_app(SimulationConfig::default());
    let (planet, _) = spawn_planet_with_building(&mut original);
    step(&mut original, 10);

    let world = original.world();
    let record = KinematicsRecord::from_state(world.get(planet).unwrap());
    let state = record.to_state(&WorldLimit::default(), |_| None).unwrap();

    // Same integrator kinds as the original, restarted from the record.
    let mut linear = world.get::<LinearDynamics>(planet).unwrap().clone();
    let mut angular = world.get::<AngularDynamics>(planet).unwrap().clone();
    linear.reinit(&state);
    angular.reinit(&state);
    assert_eq!(linear.position().value(), state.local_origin());
    assert_eq!(linear.position().prev_value(), state.local_origin());
    assert_eq!(angular.angle().value(), state.local_angle());

    let integrators = world.resource::<SimulationConfig>().integrators;
    let mut bundle = RigidBodyBundle::new(state, 1e6, 1e7, &integrators);
    bundle.body.linear = linear;
    bundle.angular = angular;

    let mut restarted = create_test_app(SimulationConfig::default());
    let restarted_planet = restarted.world_mut().spawn(bundle).id();

    step(&mut original, 5);
    step(&mut restarted, 5);

    assert_ne!(
        global_origin(original.world(), planet),
        global_origin(restarted.world(), restarted_planet)
    );
}
