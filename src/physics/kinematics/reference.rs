//! Weak references between kinematic states
//!
//! A state refers to its parent by [`Entity`]. Every resolution goes through
//! a [`KinematicsLookup`], so a despawned parent simply stops resolving and
//! the child falls back to its local values.

use super::KinematicsState;
use crate::physics::math::{Rotation, Scalar, rotation};
use bevy::ecs::query::QueryFilter;
use bevy::prelude::*;
use std::collections::HashMap;
use thiserror::Error;

/// Longest reference chain that is followed. Links beyond are ignored.
pub const MAX_REFERENCE_DEPTH: usize = 32;

/// Read access to kinematic states by entity.
pub trait KinematicsLookup {
    fn kinematics(&self, entity: Entity) -> Option<&KinematicsState>;
}

impl KinematicsLookup for World {
    fn kinematics(&self, entity: Entity) -> Option<&KinematicsState> {
        self.get::<KinematicsState>(entity)
    }
}

impl<'w, 's, 'a, F: QueryFilter> KinematicsLookup for Query<'w, 's, &'a KinematicsState, F> {
    fn kinematics(&self, entity: Entity) -> Option<&KinematicsState> {
        self.get(entity).ok()
    }
}

impl KinematicsLookup for HashMap<Entity, KinematicsState> {
    fn kinematics(&self, entity: Entity) -> Option<&KinematicsState> {
        self.get(&entity)
    }
}

/// For states that are known to be unattached.
pub struct NoReferences;

impl KinematicsLookup for NoReferences {
    fn kinematics(&self, _entity: Entity) -> Option<&KinematicsState> {
        None
    }
}

/// Last seen reference angle and its rotation.
///
/// Queries only read the cache: when the live reference angle matches the
/// cached one the stored rotation is used, otherwise the rotation is built
/// on the spot. The cache itself is refreshed through `&mut` access once per
/// step, so shared readers never race on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceRotationCache {
    angle: Scalar,
    rotation: Rotation,
}

impl ReferenceRotationCache {
    pub const fn new() -> Self {
        Self {
            angle: 0.0,
            rotation: Rotation::IDENTITY,
        }
    }

    pub fn angle(&self) -> Scalar {
        self.angle
    }

    /// Rotation for `angle`, served from the cache when it is still valid.
    #[inline]
    pub fn rotation_for(&self, angle: Scalar) -> Rotation {
        if self.is_valid_for(angle) {
            self.rotation
        } else {
            rotation(angle)
        }
    }

    #[inline]
    pub fn is_valid_for(&self, angle: Scalar) -> bool {
        self.angle == angle
    }

    /// Recompute for `angle` if it changed. Returns true if it did.
    pub fn refresh(&mut self, angle: Scalar) -> bool {
        if self.is_valid_for(angle) {
            return false;
        }
        self.angle = angle;
        self.rotation = rotation(angle);
        true
    }
}

impl Default for ReferenceRotationCache {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AttachError {
    #[error("entity {0} cannot reference itself")]
    SelfReference(Entity),
    #[error("entity {0} has no kinematics state")]
    MissingEntity(Entity),
    #[error("attaching {child} to {parent} would close a reference cycle")]
    Cycle { child: Entity, parent: Entity },
}

/// Make `child` move relative to `parent`.
///
/// The child's local values are kept as they are and from now on interpreted
/// in the parent's frame. Use [`KinematicsState::refer_to`] first to keep the
/// child's global placement instead.
pub fn attach(world: &mut World, child: Entity, parent: Entity) -> Result<(), AttachError> {
    if child == parent {
        return Err(AttachError::SelfReference(child));
    }
    for entity in [child, parent] {
        if world.get::<KinematicsState>(entity).is_none() {
            return Err(AttachError::MissingEntity(entity));
        }
    }
    let lookup: &World = world;
    if chain_contains(lookup, parent, child) {
        return Err(AttachError::Cycle { child, parent });
    }
    let parent_angle = lookup
        .kinematics(parent)
        .map(|state| state.global_frame(lookup).angle);

    let Some(mut state) = world.get_mut::<KinematicsState>(child) else {
        return Err(AttachError::MissingEntity(child));
    };
    state.set_reference(Some(parent));
    if let Some(angle) = parent_angle {
        state.refresh_reference_cache(angle);
    }
    debug!("Attached {child} to {parent}");
    Ok(())
}

/// Drop `child`'s reference. Its local values become global values.
pub fn detach(world: &mut World, child: Entity) -> Result<(), AttachError> {
    let Some(mut state) = world.get_mut::<KinematicsState>(child) else {
        return Err(AttachError::MissingEntity(child));
    };
    if let Some(parent) = state.reference() {
        debug!("Detached {child} from {parent}");
    }
    state.set_reference(None);
    Ok(())
}

/// True if following references from `start` reaches `target`.
fn chain_contains(lookup: &impl KinematicsLookup, start: Entity, target: Entity) -> bool {
    let mut current = Some(start);
    for _ in 0..=MAX_REFERENCE_DEPTH {
        let Some(entity) = current else {
            return false;
        };
        if entity == target {
            return true;
        }
        current = lookup.kinematics(entity).and_then(KinematicsState::reference);
    }
    false
}
