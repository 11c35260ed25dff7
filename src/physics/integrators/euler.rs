//! Explicit Euler integration

use super::{Accumulator, Integrable, Integrator, IntegratorError};
use crate::physics::math::Scalar;
use serde::{Deserialize, Serialize};

/// First-order forward Euler: `value += derivative * dt`.
///
/// Keeps no derivative history, so consecutive steps are independent of each
/// other apart from the accumulated value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Euler<T: Integrable> {
    state: Accumulator<T>,
}

impl<T: Integrable> Euler<T> {
    pub const NAME: &'static str = "euler";

    pub fn new() -> Self {
        Self {
            state: Accumulator::uninitialized(),
        }
    }

    pub fn with_value(start: T) -> Self {
        Self {
            state: Accumulator::starting_at(start),
        }
    }
}

impl<T: Integrable> Default for Euler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Integrable> Integrator<T> for Euler<T> {
    fn init(&mut self, start: T) {
        self.state.init(start);
    }

    fn reset(&mut self) {
        self.state.reset();
    }

    fn integrate(&mut self, derivative: T, dt: Scalar) -> Result<T, IntegratorError> {
        self.state.ensure_initialized(Self::NAME)?;
        Ok(self.state.advance(derivative * dt))
    }

    fn integrate_clip(
        &mut self,
        derivative: T,
        dt: Scalar,
        bound: T,
    ) -> Result<T, IntegratorError> {
        self.integrate(derivative, dt)?;
        Ok(self.state.clip(bound))
    }

    fn value(&self) -> T {
        self.state.value()
    }

    fn prev_value(&self) -> T {
        self.state.prev_value()
    }

    fn shift_value(&mut self, offset: T) {
        self.state.shift(offset);
    }

    fn is_initialized(&self) -> bool {
        self.state.is_initialized()
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn convergence_order(&self) -> usize {
        1
    }

    fn history_len(&self) -> usize {
        0
    }
}
