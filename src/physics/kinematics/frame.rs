use crate::physics::math::{Rotation, Scalar, Vector, perp, rotation};
use serde::{Deserialize, Serialize};

/// Origin, velocity, angle and angular velocity of a frame, expressed in some
/// parent frame.
///
/// Composition follows a point fixed in a rotating parent: for a parent `R`
/// and local values `(o, v, θ, ω)`
///
/// ```text
/// origin           = O_R + Rot(θ_R) · o
/// velocity         = V_R + Rot(θ_R) · v + ω_R · perp(Rot(θ_R) · o)
/// angle            = θ_R + θ
/// angle_velocity   = ω_R + ω
/// ```
///
/// which is exactly the time derivative of the composed origin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Frame {
    pub origin: Vector,
    pub velocity: Vector,
    pub angle: Scalar,
    pub angle_velocity: Scalar,
}

impl Frame {
    pub const IDENTITY: Frame = Frame {
        origin: Vector::ZERO,
        velocity: Vector::ZERO,
        angle: 0.0,
        angle_velocity: 0.0,
    };

    /// Express this frame, given relative to `parent`, in `parent`'s own parent.
    #[inline]
    pub fn compose(&self, parent: &Frame) -> Frame {
        self.compose_rotated(parent, &rotation(parent.angle))
    }

    /// Like [`Frame::compose`] with `Rot(parent.angle)` supplied by the caller.
    #[inline]
    pub fn compose_rotated(&self, parent: &Frame, parent_rotation: &Rotation) -> Frame {
        let offset = *parent_rotation * self.origin;
        Frame {
            origin: parent.origin + offset,
            velocity: parent.velocity
                + *parent_rotation * self.velocity
                + parent.angle_velocity * perp(offset),
            angle: parent.angle + self.angle,
            angle_velocity: parent.angle_velocity + self.angle_velocity,
        }
    }

    /// Inverse of [`Frame::compose`]: express this frame relative to `parent`,
    /// both given in the same enclosing frame.
    pub fn relative_to(&self, parent: &Frame) -> Frame {
        let inverse = rotation(-parent.angle);
        let offset = self.origin - parent.origin;
        Frame {
            origin: inverse * offset,
            velocity: inverse
                * (self.velocity - parent.velocity - parent.angle_velocity * perp(offset)),
            angle: self.angle - parent.angle,
            angle_velocity: self.angle_velocity - parent.angle_velocity,
        }
    }

    /// Map a point fixed in this frame into the enclosing frame.
    #[inline]
    pub fn point(&self, local: Vector) -> Vector {
        self.origin + rotation(self.angle) * local
    }
}
