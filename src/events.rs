//! Centralized event definitions
//!
//! Events are the mechanism for driving the simulation from outside the
//! fixed-step systems, e.g. from a front end or the headless driver.

use crate::physics::integrators::IntegratorKind;
use bevy::prelude::*;

// Unified simulation command pattern
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationCommand {
    TogglePause,
    /// Switch every body's integrators to one method, continuing from the
    /// current values
    SetIntegrators(IntegratorKind),
}
