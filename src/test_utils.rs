//! Test utilities for plugin and system testing

use crate::prelude::*;

/// Creates a minimal headless app running [`SimulationPlugin`] with `config`
pub fn create_test_app(config: SimulationConfig) -> App {
    let mut app = App::new();

    app.add_plugins(MinimalPlugins);
    app.insert_resource(config);
    app.add_plugins(SimulationPlugin);

    app
}

/// Runs the fixed-step schedule `count` times, independent of wall-clock time
pub fn step(app: &mut App, count: usize) {
    for _ in 0..count {
        app.world_mut().run_schedule(FixedUpdate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_app() {
        let app = create_test_app(SimulationConfig::default());
        assert!(app.world().contains_resource::<Time>());
        assert!(app.world().contains_resource::<PhysicsTime>());
        assert!(app.world().contains_resource::<WorldLimit>());
    }

    #[test]
    fn test_step_advances_bodies() {
        let mut config = SimulationConfig::default();
        config.physics.time_step = 0.5;
        config.integrators = crate::config::IntegratorsConfig::uniform(
            crate::physics::integrators::IntegratorKind::Euler,
        );
        let mut app = create_test_app(config.clone());
        let body = app
            .world_mut()
            .spawn(BodyBundle::point_mass(
                KinematicsState::new().with_velocity(Vector::new(2.0, 0.0)),
                1.0,
                &config.integrators,
            ))
            .id();

        step(&mut app, 2);

        let state = app.world().get::<KinematicsState>(body).unwrap();
        assert_eq!(state.local_origin(), Vector::new(2.0, 0.0));
    }
}
