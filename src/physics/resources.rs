//! Physics resources for simulation

use crate::physics::math::Scalar;
use bevy::prelude::*;

/// Resource for physics timestep control
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct PhysicsTime {
    /// Timestep for physics simulation
    pub dt: Scalar,
    /// Global speed-up applied on top of each body's own time factor
    pub time_factor: Scalar,
    /// Whether physics is paused
    pub paused: bool,
    /// Number of fixed steps simulated so far
    pub steps: u64,
}

impl Default for PhysicsTime {
    fn default() -> Self {
        Self {
            dt: 1.0 / 60.0,
            time_factor: 1.0,
            paused: false,
            steps: 0,
        }
    }
}

impl PhysicsTime {
    pub fn new(dt: Scalar, time_factor: Scalar, paused: bool) -> Self {
        Self {
            dt,
            time_factor,
            paused,
            steps: 0,
        }
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn unpause(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Timestep scaled by the global time factor
    #[inline]
    pub fn scaled_dt(&self) -> Scalar {
        self.dt * self.time_factor
    }

    /// Simulated time elapsed, in unscaled seconds
    pub fn elapsed(&self) -> Scalar {
        self.steps as Scalar * self.dt
    }
}
