//! Adams–Moulton integration (corrector form, evaluated explicitly)

use super::{Accumulator, Integrable, Integrator, IntegratorError, push_derivative, weighted_sum};
use crate::physics::math::Scalar;
use serde::{Deserialize, Serialize};

/// Weights for the five trailing derivative samples, newest first.
pub const ADAMS_MOULTON_WEIGHTS: [Scalar; 5] = [
    251.0 / 720.0,
    646.0 / 720.0,
    -264.0 / 720.0,
    106.0 / 720.0,
    -19.0 / 720.0,
];

/// Fifth-order Adams–Moulton method.
///
/// ```text
/// value += dt * (251/720 d0 + 646/720 d1 - 264/720 d2 + 106/720 d3 - 19/720 d4)
/// ```
///
/// The implicit formula needs the derivative at the end of the step. The
/// simulation supplies it directly: velocities are advanced first, and the
/// freshly integrated velocity is the derivative handed to the position
/// integrator. Positions and angles use this method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdamsMoulton<T: Integrable> {
    state: Accumulator<T>,
    history: [T; 5],
}

impl<T: Integrable> AdamsMoulton<T> {
    pub const NAME: &'static str = "adams_moulton";

    pub fn new() -> Self {
        Self {
            state: Accumulator::uninitialized(),
            history: [T::ZERO; 5],
        }
    }

    pub fn with_value(start: T) -> Self {
        Self {
            state: Accumulator::starting_at(start),
            history: [T::ZERO; 5],
        }
    }

    /// Trailing derivative samples, newest first
    pub fn history(&self) -> &[T; 5] {
        &self.history
    }
}

impl<T: Integrable> Default for AdamsMoulton<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Integrable> Integrator<T> for AdamsMoulton<T> {
    fn init(&mut self, start: T) {
        self.state.init(start);
        self.history = [T::ZERO; 5];
    }

    fn reset(&mut self) {
        self.state.reset();
        self.history = [T::ZERO; 5];
    }

    fn integrate(&mut self, derivative: T, dt: Scalar) -> Result<T, IntegratorError> {
        self.state.ensure_initialized(Self::NAME)?;
        push_derivative(&mut self.history, derivative);
        let slope = weighted_sum(&self.history, &ADAMS_MOULTON_WEIGHTS);
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
        5
    }

    fn history_len(&self) -> usize {
        self.history.len()
    }
}
