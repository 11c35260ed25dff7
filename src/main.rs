use bevy::log::{Level, LogPlugin};
use clap::Parser;
use planeworld::cli::{Args, handle_list_integrators, load_and_apply_config};
use planeworld::physics::components::ForceAccumulator;
use planeworld::plugins::simulation::{PhysicsSet, physics_running};
use planeworld::prelude::*;

/// Marks the body that fires its engine every step
#[derive(Component)]
struct Thruster {
    force: Vector,
    point: Vector,
}

fn main() {
    let args = Args::parse();

    if args.list_integrators {
        handle_list_integrators();
        return;
    }

    let config = match load_and_apply_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let mut app = App::new();
    app.add_plugins((
        MinimalPlugins,
        LogPlugin {
            level: if args.verbose {
                Level::DEBUG
            } else {
                Level::INFO
            },
            ..default()
        },
    ));
    let steps = config.physics.steps;
    app.insert_resource(config);
    app.add_plugins(SimulationPlugin);
    app.add_systems(
        FixedUpdate,
        fire_thrusters
            .before(PhysicsSet::Integrate)
            .run_if(physics_running),
    );

    spawn_demo_bodies(app.world_mut());

    let report_every = (steps / 10).max(1);
    for done in 0..steps {
        app.world_mut().run_schedule(FixedUpdate);
        if (done + 1) % report_every == 0 {
            report(app.world_mut());
        }
    }
    info!(
        "Simulated {} steps ({:.3} s)",
        app.world().resource::<PhysicsTime>().steps,
        app.world().resource::<PhysicsTime>().elapsed()
    );
}

/// A spinning planet carrying a building on its surface, and a free ship.
fn spawn_demo_bodies(world: &mut World) {
    let config = world.resource::<SimulationConfig>().clone();
    let limit = *world.resource::<WorldLimit>();

    let planet = world
        .spawn((
            Name::new("Planet"),
            RigidBodyBundle::new(
                KinematicsState::new()
                    .with_origin(Vector::new(0.0, 0.0), &limit)
                    .with_angle_velocity(0.05),
                5.0e6,
                1.0e9,
                &config.integrators,
            ),
        ))
        .id();

    world.spawn((
        Name::new("Building"),
        BodyBundle::point_mass(
            KinematicsState::new()
                .with_origin(Vector::new(0.0, 100.0), &limit)
                .with_reference(planet),
            1.0e3,
            &config.integrators,
        ),
    ));

    world.spawn((
        Name::new("Ship"),
        RigidBodyBundle::new(
            KinematicsState::new()
                .with_origin(Vector::new(-50.0, 120.0), &limit)
                .with_velocity(Vector::new(3.0, 0.0)),
            2.0e3,
            5.0e3,
            &config.integrators,
        ),
        Thruster {
            force: Vector::new(0.0, 400.0),
            point: Vector::new(-1.0, -2.0),
        },
    ));
}

fn fire_thrusters(mut thrusters: Query<(&Thruster, &KinematicsState, &mut ForceAccumulator)>) {
    for (thruster, state, mut forces) in thrusters.iter_mut() {
        forces.add_force_local(thruster.force, thruster.point, state.local_angle());
    }
}

fn report(world: &mut World) {
    let mut bodies = world.query::<(&Name, &KinematicsState)>();
    let world: &World = world;
    let step = world.resource::<PhysicsTime>().steps;
    for (name, state) in bodies.iter(world) {
        let frame = state.global_frame(world);
        info!(
            "[{step:>6}] {name:<8} origin=({:.3}, {:.3}) velocity=({:.3}, {:.3}) angle={:.4} angle_velocity={:.4}",
            frame.origin.x,
            frame.origin.y,
            frame.velocity.x,
            frame.velocity.y,
            frame.angle,
            frame.angle_velocity,
        );
    }
}
