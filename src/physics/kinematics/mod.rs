//! Kinematic state in chained local reference frames
//!
//! Each body stores its origin, velocity, angle and angular velocity relative
//! to an optional reference body. Global values are resolved on demand by
//! walking the reference chain, so a building placed on a rotating planet
//! moves with the planet without ever being updated itself.

mod frame;
pub mod record;
mod reference;

pub use frame::Frame;
pub use record::{KinematicsRecord, RecordError};
pub use reference::{
    AttachError, KinematicsLookup, MAX_REFERENCE_DEPTH, NoReferences, ReferenceRotationCache,
    attach, detach,
};

use crate::physics::math::{Rotation, Scalar, Vector, rotation};
use crate::physics::world_limit::WorldLimit;
use bevy::prelude::*;

#[derive(Component, Debug, Clone)]
pub struct KinematicsState {
    origin: Vector,
    velocity: Vector,
    angle: Scalar,
    angle_velocity: Scalar,
    /// `Rot(angle)`, kept in step with every angle change
    rotation: Rotation,
    reference: Option<Entity>,
    reference_cache: ReferenceRotationCache,
}

impl Default for KinematicsState {
    fn default() -> Self {
        Self::new()
    }
}

impl KinematicsState {
    /// Unattached state at rest at the world origin.
    pub const fn new() -> Self {
        Self {
            origin: Vector::ZERO,
            velocity: Vector::ZERO,
            angle: 0.0,
            angle_velocity: 0.0,
            rotation: Rotation::IDENTITY,
            reference: None,
            reference_cache: ReferenceRotationCache::new(),
        }
    }

    /// Unattached state with the given local values, origin wrapped into `limit`.
    pub fn from_frame(frame: Frame, limit: &WorldLimit) -> Self {
        let mut state = Self::new();
        state.set_origin(frame.origin, limit);
        state.velocity = frame.velocity;
        state.set_angle(frame.angle);
        state.angle_velocity = frame.angle_velocity;
        state
    }

    pub fn with_origin(mut self, origin: Vector, limit: &WorldLimit) -> Self {
        self.set_origin(origin, limit);
        self
    }

    pub fn with_velocity(mut self, velocity: Vector) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_angle(mut self, angle: Scalar) -> Self {
        self.set_angle(angle);
        self
    }

    pub fn with_angle_velocity(mut self, angle_velocity: Scalar) -> Self {
        self.angle_velocity = angle_velocity;
        self
    }

    pub fn with_reference(mut self, reference: Entity) -> Self {
        self.reference = Some(reference);
        self
    }

    #[inline]
    pub fn local_origin(&self) -> Vector {
        self.origin
    }

    #[inline]
    pub fn local_velocity(&self) -> Vector {
        self.velocity
    }

    #[inline]
    pub fn local_angle(&self) -> Scalar {
        self.angle
    }

    #[inline]
    pub fn local_angle_velocity(&self) -> Scalar {
        self.angle_velocity
    }

    #[inline]
    pub fn local_rotation(&self) -> Rotation {
        self.rotation
    }

    #[inline]
    pub fn reference(&self) -> Option<Entity> {
        self.reference
    }

    pub fn reference_cache(&self) -> &ReferenceRotationCache {
        &self.reference_cache
    }

    pub fn local_frame(&self) -> Frame {
        Frame {
            origin: self.origin,
            velocity: self.velocity,
            angle: self.angle,
            angle_velocity: self.angle_velocity,
        }
    }

    /// Store `origin` wrapped into the world boundary.
    ///
    /// Returns the offset the wrap applied, zero when `origin` was inside.
    pub fn set_origin(&mut self, origin: Vector, limit: &WorldLimit) -> Vector {
        self.origin = limit.clip(origin);
        self.origin - origin
    }

    pub fn set_velocity(&mut self, velocity: Vector) {
        self.velocity = velocity;
    }

    pub fn set_angle(&mut self, angle: Scalar) {
        self.angle = angle;
        self.rotation = rotation(angle);
    }

    pub fn set_angle_velocity(&mut self, angle_velocity: Scalar) {
        self.angle_velocity = angle_velocity;
    }

    pub fn increase_angle(&mut self, delta: Scalar) {
        self.set_angle(self.angle + delta);
    }

    /// Link to `reference`, or clear the link with `None`.
    pub fn set_reference(&mut self, reference: Option<Entity>) {
        self.reference = reference;
    }

    /// Update the cached reference rotation for the live reference angle.
    pub fn refresh_reference_cache(&mut self, reference_angle: Scalar) -> bool {
        self.reference_cache.refresh(reference_angle)
    }

    /// Global frame of the reference and its rotation, if the reference resolves.
    fn resolve_reference<L: KinematicsLookup + ?Sized>(
        &self,
        lookup: &L,
        depth: usize,
    ) -> Option<(Frame, Rotation)> {
        let entity = self.reference?;
        let Some(parent) = lookup.kinematics(entity) else {
            debug!("Reference {entity} no longer resolves, using local values");
            return None;
        };
        if depth >= MAX_REFERENCE_DEPTH {
            warn!("Reference chain deeper than {MAX_REFERENCE_DEPTH} truncated at {entity}");
            return None;
        }
        let parent_frame = parent.resolve(lookup, depth + 1);
        let parent_rotation = self.reference_cache.rotation_for(parent_frame.angle);
        Some((parent_frame, parent_rotation))
    }

    fn resolve<L: KinematicsLookup + ?Sized>(&self, lookup: &L, depth: usize) -> Frame {
        let local = self.local_frame();
        match self.resolve_reference(lookup, depth) {
            Some((parent, parent_rotation)) => local.compose_rotated(&parent, &parent_rotation),
            None => local,
        }
    }

    /// All four quantities resolved through the reference chain.
    pub fn global_frame<L: KinematicsLookup + ?Sized>(&self, lookup: &L) -> Frame {
        self.resolve(lookup, 0)
    }

    pub fn origin<L: KinematicsLookup + ?Sized>(&self, lookup: &L) -> Vector {
        self.global_frame(lookup).origin
    }

    pub fn velocity<L: KinematicsLookup + ?Sized>(&self, lookup: &L) -> Vector {
        self.global_frame(lookup).velocity
    }

    pub fn angle<L: KinematicsLookup + ?Sized>(&self, lookup: &L) -> Scalar {
        self.global_frame(lookup).angle
    }

    pub fn angle_velocity<L: KinematicsLookup + ?Sized>(&self, lookup: &L) -> Scalar {
        self.global_frame(lookup).angle_velocity
    }

    /// Point fixed in this body, in the frame of its reference.
    #[inline]
    pub fn local_position(&self, point: Vector) -> Vector {
        self.rotation * point + self.origin
    }

    /// Point fixed in this body, in the global frame.
    pub fn position<L: KinematicsLookup + ?Sized>(&self, point: Vector, lookup: &L) -> Vector {
        let local = self.local_position(point);
        match self.resolve_reference(lookup, 0) {
            Some((parent, parent_rotation)) => parent.origin + parent_rotation * local,
            None => local,
        }
    }

    /// Batch form of [`KinematicsState::position`] for shape outlines; each
    /// point is scaled by `1 / zoom` before the transform.
    pub fn positions<const N: usize, L: KinematicsLookup + ?Sized>(
        &self,
        points: &[Vector; N],
        zoom: Scalar,
        lookup: &L,
    ) -> [Vector; N] {
        let reference = self.resolve_reference(lookup, 0);
        points.map(|point| {
            let local = self.local_position(point / zoom);
            match reference {
                Some((parent, parent_rotation)) => parent.origin + parent_rotation * local,
                None => local,
            }
        })
    }

    /// This state's local values composed onto `other`'s global frame, as if
    /// `other` were the reference. Neither state is modified.
    pub fn referred_to<L: KinematicsLookup + ?Sized>(
        &self,
        other: &KinematicsState,
        lookup: &L,
    ) -> Frame {
        self.local_frame().compose(&other.global_frame(lookup))
    }

    /// Origin composed onto `other`'s global frame. For the inverse, e.g.
    /// a global position seen from a camera body, use [`Frame::relative_to`].
    pub fn origin_referred_to<L: KinematicsLookup + ?Sized>(
        &self,
        other: &KinematicsState,
        lookup: &L,
    ) -> Vector {
        let frame = other.global_frame(lookup);
        frame.origin + rotation(frame.angle) * self.origin
    }

    pub fn velocity_referred_to<L: KinematicsLookup + ?Sized>(
        &self,
        other: &KinematicsState,
        lookup: &L,
    ) -> Vector {
        self.referred_to(other, lookup).velocity
    }

    pub fn angle_referred_to<L: KinematicsLookup + ?Sized>(
        &self,
        other: &KinematicsState,
        lookup: &L,
    ) -> Scalar {
        other.angle(lookup) + self.angle
    }

    pub fn angle_velocity_referred_to<L: KinematicsLookup + ?Sized>(
        &self,
        other: &KinematicsState,
        lookup: &L,
    ) -> Scalar {
        other.angle_velocity(lookup) + self.angle_velocity
    }

    /// Point fixed in this body, placed as if `other` were the reference.
    pub fn position_referred_to<L: KinematicsLookup + ?Sized>(
        &self,
        point: Vector,
        other: &KinematicsState,
        lookup: &L,
    ) -> Vector {
        let frame = other.global_frame(lookup);
        frame.origin + rotation(frame.angle) * self.local_position(point)
    }

    /// Fold `other`'s current global frame into the local values once.
    ///
    /// Afterwards the state is unattached and its local values equal what
    /// [`KinematicsState::referred_to`] returned before the call. The new
    /// origin is wrapped into `limit`.
    pub fn refer_to<L: KinematicsLookup + ?Sized>(
        &mut self,
        other: &KinematicsState,
        lookup: &L,
        limit: &WorldLimit,
    ) {
        let frame = self.referred_to(other, lookup);
        self.set_origin(frame.origin, limit);
        self.velocity = frame.velocity;
        self.set_angle(frame.angle);
        self.angle_velocity = frame.angle_velocity;
        self.reference = None;
    }

    /// Move the origin so that `axis_local` (a point fixed in this body) lands
    /// on `axis_global` (a point in the reference frame), keeping the angle.
    pub fn transform(&mut self, axis_global: Vector, axis_local: Vector, limit: &WorldLimit) {
        self.set_origin(axis_global - self.rotation * axis_local, limit);
    }
}
