//! Physics components for bodies moving in reference frames

use crate::config::IntegratorsConfig;
use crate::physics::integrators::{AnyIntegrator, Integrator, IntegratorError, IntegratorKind};
use crate::physics::kinematics::KinematicsState;
use crate::physics::math::{Scalar, TAU, Vector, cross, rotation};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Mass component for physics bodies
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mass(pub Scalar);

impl Mass {
    pub fn new(mass: Scalar) -> Self {
        Self(mass)
    }

    #[inline]
    pub fn value(&self) -> Scalar {
        self.0
    }
}

/// Moment of inertia about the body origin
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Inertia(pub Scalar);

impl Inertia {
    pub fn new(inertia: Scalar) -> Self {
        Self(inertia)
    }

    #[inline]
    pub fn value(&self) -> Scalar {
        self.0
    }
}

/// Per-body multiplier on the simulation timestep
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeFactor(pub Scalar);

impl Default for TimeFactor {
    fn default() -> Self {
        Self(1.0)
    }
}

impl TimeFactor {
    #[inline]
    pub fn value(&self) -> Scalar {
        self.0
    }
}

/// Force and torque collected during one step, cleared after integration.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct ForceAccumulator {
    force: Vector,
    torque: Scalar,
}

impl ForceAccumulator {
    #[inline]
    pub fn force(&self) -> Vector {
        self.force
    }

    #[inline]
    pub fn torque(&self) -> Scalar {
        self.torque
    }

    /// Apply `force` at `point_of_contact`; torque is taken about `center`.
    /// Both points are in the same frame as the force.
    pub fn add_force(&mut self, force: Vector, point_of_contact: Vector, center: Vector) {
        self.force += force;
        self.torque += cross(point_of_contact - center, force);
    }

    /// Apply a force given in body coordinates at a body-fixed `point`, for a
    /// body rotated by `angle`.
    pub fn add_force_local(&mut self, force: Vector, point: Vector, angle: Scalar) {
        let rotation = rotation(angle);
        let force = rotation * force;
        self.force += force;
        self.torque += cross(rotation * point, force);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Position and velocity integrators of a body.
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearDynamics {
    position: AnyIntegrator<Vector>,
    velocity: AnyIntegrator<Vector>,
}

impl LinearDynamics {
    /// Integrators initialized from the state's local origin and velocity.
    pub fn new(
        position_kind: IntegratorKind,
        velocity_kind: IntegratorKind,
        state: &KinematicsState,
    ) -> Self {
        Self {
            position: AnyIntegrator::with_value(position_kind, state.local_origin()),
            velocity: AnyIntegrator::with_value(velocity_kind, state.local_velocity()),
        }
    }

    pub fn position(&self) -> &AnyIntegrator<Vector> {
        &self.position
    }

    pub fn velocity(&self) -> &AnyIntegrator<Vector> {
        &self.velocity
    }

    /// Advance velocity from `acceleration`, then position from the new velocity.
    ///
    /// Returns the new `(position, velocity)`.
    pub fn step(
        &mut self,
        acceleration: Vector,
        dt: Scalar,
    ) -> Result<(Vector, Vector), IntegratorError> {
        let velocity = self.velocity.integrate(acceleration, dt)?;
        let position = self.position.integrate(velocity, dt)?;
        Ok((position, velocity))
    }

    /// Follow a world-limit wrap of the origin without losing history.
    pub fn shift_position(&mut self, offset: Vector) {
        self.position.shift_value(offset);
    }

    /// Switch both integrators to `kind`, continuing from their current values.
    pub fn set_integrators(&mut self, kind: IntegratorKind) {
        self.position.swap_kind(kind);
        self.velocity.swap_kind(kind);
    }

    /// Restart both integrators from the state's local values.
    pub fn reinit(&mut self, state: &KinematicsState) {
        self.position.init(state.local_origin());
        self.velocity.init(state.local_velocity());
    }
}

/// Angle and angular velocity integrators of a rigid body.
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AngularDynamics {
    angle: AnyIntegrator<Scalar>,
    angle_velocity: AnyIntegrator<Scalar>,
}

impl AngularDynamics {
    pub fn new(
        angle_kind: IntegratorKind,
        angle_velocity_kind: IntegratorKind,
        state: &KinematicsState,
    ) -> Self {
        Self {
            angle: AnyIntegrator::with_value(angle_kind, state.local_angle()),
            angle_velocity: AnyIntegrator::with_value(
                angle_velocity_kind,
                state.local_angle_velocity(),
            ),
        }
    }

    pub fn angle(&self) -> &AnyIntegrator<Scalar> {
        &self.angle
    }

    pub fn angle_velocity(&self) -> &AnyIntegrator<Scalar> {
        &self.angle_velocity
    }

    /// Advance angular velocity from `angle_acceleration`, then the angle,
    /// which is kept in `[0, 2π)`.
    ///
    /// Returns the new `(angle, angle_velocity)`.
    pub fn step(
        &mut self,
        angle_acceleration: Scalar,
        dt: Scalar,
    ) -> Result<(Scalar, Scalar), IntegratorError> {
        let angle_velocity = self.angle_velocity.integrate(angle_acceleration, dt)?;
        let angle = self.angle.integrate_clip(angle_velocity, dt, TAU)?;
        Ok((angle, angle_velocity))
    }

    pub fn set_integrators(&mut self, kind: IntegratorKind) {
        self.angle.swap_kind(kind);
        self.angle_velocity.swap_kind(kind);
    }

    pub fn reinit(&mut self, state: &KinematicsState) {
        self.angle.init(state.local_angle());
        self.angle_velocity.init(state.local_angle_velocity());
    }
}

/// Component bundle for a point mass: translation only
#[derive(Bundle)]
pub struct BodyBundle {
    pub kinematics: KinematicsState,
    pub linear: LinearDynamics,
    pub mass: Mass,
    pub forces: ForceAccumulator,
    pub time_factor: TimeFactor,
}

impl BodyBundle {
    pub fn point_mass(state: KinematicsState, mass: Scalar, integrators: &IntegratorsConfig) -> Self {
        Self {
            linear: LinearDynamics::new(integrators.position, integrators.velocity, &state),
            kinematics: state,
            mass: Mass::new(mass),
            forces: ForceAccumulator::default(),
            time_factor: TimeFactor::default(),
        }
    }
}

/// Component bundle for a rigid body: translation and rotation
#[derive(Bundle)]
pub struct RigidBodyBundle {
    pub body: BodyBundle,
    pub angular: AngularDynamics,
    pub inertia: Inertia,
}

impl RigidBodyBundle {
    pub fn new(
        state: KinematicsState,
        mass: Scalar,
        inertia: Scalar,
        integrators: &IntegratorsConfig,
    ) -> Self {
        Self {
            angular: AngularDynamics::new(integrators.angle, integrators.angle_velocity, &state),
            body: BodyBundle::point_mass(state, mass, integrators),
            inertia: Inertia::new(inertia),
        }
    }
}
