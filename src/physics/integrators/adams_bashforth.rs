//! Four-step Adams–Bashforth integration (explicit predictor)

use super::{Accumulator, Integrable, Integrator, IntegratorError, push_derivative, weighted_sum};
use crate::physics::math::Scalar;
use serde::{Deserialize, Serialize};

/// Weights for the four trailing derivative samples, newest first.
pub const ADAMS_BASHFORTH_WEIGHTS: [Scalar; 4] =
    [55.0 / 24.0, -59.0 / 24.0, 37.0 / 24.0, -3.0 / 8.0];

/// Explicit four-step Adams–Bashforth method.
///
/// ```text
/// value += dt * (55/24 d0 - 59/24 d1 + 37/24 d2 - 3/8 d3)
/// ```
///
/// The history starts out zeroed, so the first steps after `init` weight the
/// missing samples with zero rather than bootstrapping with a lower-order
/// method. The simulation uses this method for velocities (from
/// acceleration), as the predictor half of the predictor/corrector split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdamsBashforth<T: Integrable> {
    state: Accumulator<T>,
    history: [T; 4],
}

impl<T: Integrable> AdamsBashforth<T> {
    pub const NAME: &'static str = "adams_bashforth";

    pub fn new() -> Self {
        Self {
            state: Accumulator::uninitialized(),
            history: [T::ZERO; 4],
        }
    }

    pub fn with_value(start: T) -> Self {
        Self {
            state: Accumulator::starting_at(start),
            history: [T::ZERO; 4],
        }
    }

    /// Trailing derivative samples, newest first
    pub fn history(&self) -> &[T; 4] {
        &self.history
    }
}

impl<T: Integrable> Default for AdamsBashforth<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Integrable> Integrator<T> for AdamsBashforth<T> {
    fn init(&mut self, start: T) {
        self.state.init(start);
        self.history = [T::ZERO; 4];
    }

    fn reset(&mut self) {
        self.state.reset();
        self.history = [T::ZERO; 4];
    }

    fn integrate(&mut self, derivative: T, dt: Scalar) -> Result<T, IntegratorError> {
        self.state.ensure_initialized(Self::NAME)?;
        push_derivative(&mut self.history, derivative);
        let slope = weighted_sum(&self.history, &ADAMS_BASHFORTH_WEIGHTS);
        Ok(self.state.advance(slope * dt))
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
        4
    }

    fn history_len(&self) -> usize {
        self.history.len()
    }
}
