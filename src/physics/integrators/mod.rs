//! Fixed-step integrators for kinematic quantities
//!
//! Every integrator advances one quantity (a scalar such as an angle, or a
//! vector such as a position) from its time derivative. Multi-step methods
//! keep a short history of trailing derivative samples; `history[0]` is always
//! the newest sample.
//!
//! An integrator starts out uninitialized and must be given a starting value
//! with [`Integrator::init`] before the first step. Stepping an uninitialized
//! integrator is a caller bug and fails with [`IntegratorError::Uninitialized`]
//! instead of silently integrating from zero.

use crate::physics::math::{Scalar, Vector, wrap_into};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::ops::{Add, Mul, Sub};
use thiserror::Error;

pub mod adams_bashforth;
pub mod adams_moulton;
pub mod euler;
pub mod kind;
pub mod registry;

pub use adams_bashforth::AdamsBashforth;
pub use adams_moulton::AdamsMoulton;
pub use euler::Euler;
pub use kind::{AnyIntegrator, IntegratorKind};
pub use registry::IntegratorRegistry;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegratorError {
    #[error("{method} integrator stepped before init")]
    Uninitialized { method: &'static str },
    #[error("Unknown integrator: '{name}'. Available integrators: {available}")]
    UnknownIntegrator { name: String, available: String },
}

/// A quantity that can be integrated over time.
pub trait Integrable:
    Copy
    + Debug
    + PartialEq
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Scalar, Output = Self>
    + Send
    + Sync
    + 'static
{
    const ZERO: Self;

    /// Wrap into `[0, bound)`, component-wise for vectors.
    fn wrap(self, bound: Self) -> Self;
}

impl Integrable for Scalar {
    const ZERO: Self = 0.0;

    fn wrap(self, bound: Self) -> Self {
        wrap_into(self, bound)
    }
}

impl Integrable for Vector {
    const ZERO: Self = Vector::ZERO;

    fn wrap(self, bound: Self) -> Self {
        Vector::new(wrap_into(self.x, bound.x), wrap_into(self.y, bound.y))
    }
}

/// Shared contract of all integrators
pub trait Integrator<T: Integrable>: Send + Sync {
    /// Set the starting value and clear all derivative history.
    fn init(&mut self, start: T);

    /// Zero the value, previous value and derivative history.
    ///
    /// The integrator counts as initialized afterwards.
    fn reset(&mut self);

    /// Advance by one step of length `dt` and return the new value.
    ///
    /// Must be called exactly once per simulation step: every call shifts
    /// the derivative history.
    fn integrate(&mut self, derivative: T, dt: Scalar) -> Result<T, IntegratorError>;

    /// Like [`Integrator::integrate`], then wrap the stored value into `[0, bound)`.
    fn integrate_clip(&mut self, derivative: T, dt: Scalar, bound: T)
    -> Result<T, IntegratorError>;

    fn value(&self) -> T;

    /// Value before the most recent step.
    fn prev_value(&self) -> T;

    /// Translate current and previous value by `offset`, keeping the history.
    fn shift_value(&mut self, offset: T);

    fn is_initialized(&self) -> bool;

    fn name(&self) -> &'static str;

    fn convergence_order(&self) -> usize;

    /// Number of trailing derivative samples this method keeps
    fn history_len(&self) -> usize;
}

/// Current and previous value plus the init state, common to every method.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Accumulator<T> {
    value: T,
    prev_value: T,
    initialized: bool,
}

impl<T: Integrable> Accumulator<T> {
    pub const fn uninitialized() -> Self {
        Self {
            value: T::ZERO,
            prev_value: T::ZERO,
            initialized: false,
        }
    }

    pub fn starting_at(start: T) -> Self {
        Self {
            value: start,
            prev_value: start,
            initialized: true,
        }
    }

    #[inline]
    pub fn value(&self) -> T {
        self.value
    }

    #[inline]
    pub fn prev_value(&self) -> T {
        self.prev_value
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn init(&mut self, start: T) {
        *self = Self::starting_at(start);
    }

    pub fn reset(&mut self) {
        *self = Self::starting_at(T::ZERO);
    }

    pub fn ensure_initialized(&self, method: &'static str) -> Result<(), IntegratorError> {
        if self.initialized {
            Ok(())
        } else {
            Err(IntegratorError::Uninitialized { method })
        }
    }

    /// Add `increment` to the value, remembering the old one.
    #[inline]
    pub fn advance(&mut self, increment: T) -> T {
        self.prev_value = self.value;
        self.value = self.value + increment;
        self.value
    }

    #[inline]
    pub fn clip(&mut self, bound: T) -> T {
        self.value = self.value.wrap(bound);
        self.value
    }

    #[inline]
    pub fn shift(&mut self, offset: T) {
        self.value = self.value + offset;
        self.prev_value = self.prev_value + offset;
    }
}

impl<T: Integrable> Default for Accumulator<T> {
    fn default() -> Self {
        Self::uninitialized()
    }
}

/// Shift `derivative` into the history, dropping the oldest sample.
#[inline]
pub(crate) fn push_derivative<T: Copy>(history: &mut [T], derivative: T) {
    history.rotate_right(1);
    history[0] = derivative;
}

/// `Σ weights[i] * history[i]`
#[inline]
pub(crate) fn weighted_sum<T: Integrable>(history: &[T], weights: &[Scalar]) -> T {
    history
        .iter()
        .zip(weights)
        .fold(T::ZERO, |sum, (&derivative, &weight)| sum + derivative * weight)
}
