//! Line-oriented text record of a kinematic state
//!
//! ```text
//! KinematicsState:
//! <reference id, or - when unattached>
//! <origin x> <origin y>
//! <velocity x> <velocity y>
//! <angle>
//! <angle velocity>
//! ```
//!
//! Older saves carry two extra lines with the world limit between the
//! reference id and the origin. Those are still read; the limit is handed
//! back to the caller and never applied by the record itself.

use super::{Frame, KinematicsState};
use crate::physics::math::{Scalar, Vector};
use crate::physics::world_limit::WorldLimit;
use bevy::prelude::*;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const RECORD_HEADER: &str = "KinematicsState:";

const CURRENT_FIELDS: usize = 8;
const LEGACY_FIELDS: usize = 10;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("record does not start with 'KinematicsState:'")]
    MissingHeader,
    #[error("record has {0} fields, expected 8 or 10")]
    UnexpectedLength(usize),
    #[error("invalid number '{value}' for {field}")]
    InvalidNumber { field: &'static str, value: String },
    #[error("invalid reference id '{0}'")]
    InvalidReference(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicsRecord {
    /// Stable id of the reference, resolved by the loader
    pub reference: Option<u64>,
    pub frame: Frame,
    /// World limit found in a legacy record
    pub legacy_world_limit: Option<(Scalar, Scalar)>,
}

impl KinematicsRecord {
    /// Record of the local values, with the reference stored as entity bits.
    pub fn from_state(state: &KinematicsState) -> Self {
        Self {
            reference: state.reference().map(Entity::to_bits),
            frame: state.local_frame(),
            legacy_world_limit: None,
        }
    }

    /// Rebuild a state, mapping the stored reference id through `resolve`.
    pub fn to_state(
        &self,
        limit: &WorldLimit,
        mut resolve: impl FnMut(u64) -> Option<Entity>,
    ) -> Result<KinematicsState, RecordError> {
        let mut state = KinematicsState::from_frame(self.frame, limit);
        if let Some(id) = self.reference {
            let entity = resolve(id).ok_or_else(|| RecordError::InvalidReference(id.to_string()))?;
            state.set_reference(Some(entity));
        }
        Ok(state)
    }
}

impl fmt::Display for KinematicsRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{RECORD_HEADER}")?;
        match self.reference {
            Some(id) => writeln!(f, "{id}")?,
            None => writeln!(f, "-")?,
        }
        let Frame {
            origin,
            velocity,
            angle,
            angle_velocity,
        } = self.frame;
        writeln!(f, "{} {}", origin.x, origin.y)?;
        writeln!(f, "{} {}", velocity.x, velocity.y)?;
        writeln!(f, "{angle}")?;
        writeln!(f, "{angle_velocity}")
    }
}

impl FromStr for KinematicsRecord {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split_whitespace().collect();
        if fields.first() != Some(&RECORD_HEADER) {
            return Err(RecordError::MissingHeader);
        }

        let legacy = match fields.len() {
            CURRENT_FIELDS => false,
            LEGACY_FIELDS => true,
            other => return Err(RecordError::UnexpectedLength(other)),
        };

        let reference = parse_reference(fields[1], legacy)?;
        let (legacy_world_limit, rest) = if legacy {
            let limit = (
                parse_number("world limit x", fields[2])?,
                parse_number("world limit y", fields[3])?,
            );
            (Some(limit), &fields[4..])
        } else {
            (None, &fields[2..])
        };

        let frame = Frame {
            origin: Vector::new(
                parse_number("origin x", rest[0])?,
                parse_number("origin y", rest[1])?,
            ),
            velocity: Vector::new(
                parse_number("velocity x", rest[2])?,
                parse_number("velocity y", rest[3])?,
            ),
            angle: parse_number("angle", rest[4])?,
            angle_velocity: parse_number("angle velocity", rest[5])?,
        };

        Ok(Self {
            reference,
            frame,
            legacy_world_limit,
        })
    }
}

/// `-` means no reference; legacy records use id 0 for that.
fn parse_reference(field: &str, legacy: bool) -> Result<Option<u64>, RecordError> {
    if field == "-" {
        return Ok(None);
    }
    match field.parse::<u64>() {
        Ok(0) if legacy => Ok(None),
        Ok(id) => Ok(Some(id)),
        Err(_) => Err(RecordError::InvalidReference(field.to_string())),
    }
}

fn parse_number(field: &'static str, value: &str) -> Result<Scalar, RecordError> {
    value.parse().map_err(|_| RecordError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}
