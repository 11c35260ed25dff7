//! Toroidal world boundary

use crate::physics::math::{Scalar, Vector};
use bevy::prelude::*;
use thiserror::Error;

/// Default boundary, large enough to never trigger in ordinary scenes.
pub const DEFAULT_WORLD_LIMIT: Scalar = 3.0e20;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum WorldLimitError {
    #[error("world limit must be positive, got ({x}, {y})")]
    NonPositive { x: Scalar, y: Scalar },
    #[error("world limit must be finite, got ({x}, {y})")]
    NonFinite { x: Scalar, y: Scalar },
}

/// Symmetric world boundary `[-limit, limit]` per axis.
///
/// Coordinates leaving the boundary reappear on the opposite side: a value
/// above `+limit` is shifted by `-2 * limit`, a value below `-limit` by
/// `+2 * limit`. The shift is applied once; it is not a modulo.
///
/// Owned by the simulation as a resource and passed to wherever an origin is
/// assigned. Changing it does not re-wrap origins that are already stored.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct WorldLimit {
    x: Scalar,
    y: Scalar,
}

impl WorldLimit {
    pub fn new(x: Scalar, y: Scalar) -> Result<Self, WorldLimitError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(WorldLimitError::NonFinite { x, y });
        }
        if x <= 0.0 || y <= 0.0 {
            return Err(WorldLimitError::NonPositive { x, y });
        }
        Ok(Self { x, y })
    }

    #[inline]
    pub fn x(&self) -> Scalar {
        self.x
    }

    #[inline]
    pub fn y(&self) -> Scalar {
        self.y
    }

    /// Wrap `position` back into the world boundary, independently per axis.
    #[inline]
    pub fn clip(&self, position: Vector) -> Vector {
        Vector::new(wrap_axis(position.x, self.x), wrap_axis(position.y, self.y))
    }

    /// True if `position` lies within the boundary on both axes.
    #[inline]
    pub fn contains(&self, position: Vector) -> bool {
        position.x.abs() <= self.x && position.y.abs() <= self.y
    }
}

impl Default for WorldLimit {
    fn default() -> Self {
        Self {
            x: DEFAULT_WORLD_LIMIT,
            y: DEFAULT_WORLD_LIMIT,
        }
    }
}

#[inline]
fn wrap_axis(value: Scalar, limit: Scalar) -> Scalar {
    if value > limit {
        value - 2.0 * limit
    } else if value < -limit {
        value + 2.0 * limit
    } else {
        value
    }
}
