//! Integrator and reference-frame benchmarks
//!
//! - Performance of a single integration step per method, for scalars and
//!   vectors - Lower time is better
//! - A full body step (velocity then position) with the configured
//!   predictor/corrector split - Lower time is better
//! - Global-frame resolution through reference chains of increasing depth,
//!   with and without a warm rotation cache - Lower time is better

use criterion::{BenchmarkId, Criterion, PlotConfiguration, criterion_group, criterion_main};
use std::hint::black_box;

extern crate planeworld;
use bevy::prelude::World;
use planeworld::config::IntegratorsConfig;
use planeworld::physics::components::LinearDynamics;
use planeworld::physics::integrators::{AnyIntegrator, Integrator, IntegratorKind};
use planeworld::physics::kinematics::KinematicsState;
use planeworld::physics::math::{Scalar, TAU, Vector};
use planeworld::physics::world_limit::WorldLimit;

// =============================================================================
// Integrator Benchmarks
// =============================================================================

fn bench_integrator_performance(c: &mut Criterion) {
    let mut group = c.benchmark_group("integrator_performance");
    group
        .plot_config(PlotConfiguration::default().summary_scale(criterion::AxisScale::Logarithmic));

    for kind in IntegratorKind::ALL {
        group.bench_function(BenchmarkId::new("scalar", kind.name()), |b| {
            let mut integrator: AnyIntegrator<Scalar> = AnyIntegrator::with_value(kind, 0.0);
            b.iter(|| {
                let value = integrator.integrate_clip(black_box(1.0), black_box(0.01), TAU);
                black_box(value)
            });
        });

        group.bench_function(BenchmarkId::new("vector", kind.name()), |b| {
            let mut integrator: AnyIntegrator<Vector> = AnyIntegrator::with_value(kind, Vector::ZERO);
            b.iter(|| {
                let value = integrator.integrate(black_box(Vector::new(1.0, -1.0)), black_box(0.01));
                black_box(value)
            });
        });
    }

    group.finish();
}

fn bench_body_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("body_step");
    let state = KinematicsState::new().with_origin(Vector::new(1.0, 0.0), &WorldLimit::default());

    let configurations = [
        ("predictor_corrector", IntegratorsConfig::default()),
        ("euler", IntegratorsConfig::uniform(IntegratorKind::Euler)),
    ];
    for (name, integrators) in configurations {
        group.bench_function(name, |b| {
            let mut dynamics =
                LinearDynamics::new(integrators.position, integrators.velocity, &state);
            let mut position = state.local_origin();
            b.iter(|| {
                // Harmonic oscillator, a = -x
                if let Ok((new_position, _)) = dynamics.step(-position, black_box(0.001)) {
                    position = new_position;
                }
                black_box(position)
            });
        });
    }

    group.finish();
}

// =============================================================================
// Reference Resolution Benchmarks
// =============================================================================

/// A chain of `depth` states, each attached to the previous one; returns the
/// innermost state.
fn build_chain(world: &mut World, depth: usize, warm_cache: bool) -> KinematicsState {
    let limit = WorldLimit::default();
    let mut parent = None;
    let mut parent_angle = 0.0;
    for level in 0..depth {
        let angle = 0.1 * level as Scalar;
        let mut state = KinematicsState::new()
            .with_origin(Vector::new(10.0, level as Scalar), &limit)
            .with_angle(angle)
            .with_angle_velocity(0.01);
        if let Some(parent) = parent {
            state = state.with_reference(parent);
            if warm_cache {
                state.refresh_reference_cache(parent_angle);
            }
        }
        parent_angle += angle;
        parent = Some(world.spawn(state).id());
    }

    let mut leaf = KinematicsState::new().with_origin(Vector::new(1.0, 1.0), &limit);
    if let Some(parent) = parent {
        leaf = leaf.with_reference(parent);
        if warm_cache {
            leaf.refresh_reference_cache(parent_angle);
        }
    }
    leaf
}

fn bench_reference_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("reference_resolution");

    for depth in [0, 1, 4, 16] {
        for (label, warm_cache) in [("cold_cache", false), ("warm_cache", true)] {
            let mut world = World::new();
            let leaf = build_chain(&mut world, depth, warm_cache);
            group.bench_with_input(BenchmarkId::new(label, depth), &depth, |b, _| {
                b.iter(|| black_box(leaf.global_frame(&world)));
            });
        }
    }

    group.finish();
}

// =============================================================================
// Benchmark Groups
// =============================================================================

criterion_group!(performance, bench_integrator_performance, bench_body_step);

criterion_group!(references, bench_reference_resolution);

criterion_main!(performance, references);
