/// Scalar type for physics calculations (f64 for precision)
pub type Scalar = f64;

/// 2D vector type for positions, velocities and forces
pub type Vector = bevy::math::DVec2;

/// 2x2 rotation matrix
pub type Rotation = bevy::math::DMat2;

pub const TAU: Scalar = std::f64::consts::TAU;

/// Build the counter-clockwise rotation by `angle` radians.
#[inline]
pub fn rotation(angle: Scalar) -> Rotation {
    let (sin, cos) = (libm::sin(angle), libm::cos(angle));
    Rotation::from_cols(Vector::new(cos, sin), Vector::new(-sin, cos))
}

/// Vector rotated by +90°, `(-y, x)`.
///
/// For a frame spinning at `ω`, a point fixed at offset `r` moves with `ω * perp(r)`.
#[inline]
pub fn perp(v: Vector) -> Vector {
    Vector::new(-v.y, v.x)
}

/// Wrap `value` into `[0, bound)`.
///
/// `rem_euclid` can round up to exactly `bound` for tiny negative inputs, so
/// that case folds back to zero.
#[inline]
pub fn wrap_into(value: Scalar, bound: Scalar) -> Scalar {
    let wrapped = value.rem_euclid(bound);
    if wrapped >= bound { 0.0 } else { wrapped }
}

/// 2D cross product `a.x * b.y - a.y * b.x`, the torque of `b` applied at `a`.
#[inline]
pub fn cross(a: Vector, b: Vector) -> Scalar {
    a.x * b.y - a.y * b.x
}
