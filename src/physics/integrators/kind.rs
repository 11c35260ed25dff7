//! Closed set of integration methods and the runtime-swappable integrator

use super::{AdamsBashforth, AdamsMoulton, Euler, Integrable, Integrator, IntegratorError};
use crate::physics::math::Scalar;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Selects one of the available integration methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegratorKind {
    #[serde(alias = "forward_euler")]
    Euler,
    #[serde(alias = "ab4", alias = "ab", alias = "bashforth")]
    AdamsBashforth,
    #[serde(alias = "am5", alias = "am", alias = "moulton")]
    AdamsMoulton,
}

impl IntegratorKind {
    pub const ALL: [IntegratorKind; 3] = [
        IntegratorKind::Euler,
        IntegratorKind::AdamsBashforth,
        IntegratorKind::AdamsMoulton,
    ];

    pub fn name(self) -> &'static str {
        match self {
            IntegratorKind::Euler => "euler",
            IntegratorKind::AdamsBashforth => "adams_bashforth",
            IntegratorKind::AdamsMoulton => "adams_moulton",
        }
    }

    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            IntegratorKind::Euler => &["forward_euler"],
            IntegratorKind::AdamsBashforth => &["ab4", "ab", "bashforth"],
            IntegratorKind::AdamsMoulton => &["am5", "am", "moulton"],
        }
    }

    pub fn convergence_order(self) -> usize {
        match self {
            IntegratorKind::Euler => 1,
            IntegratorKind::AdamsBashforth => 4,
            IntegratorKind::AdamsMoulton => 5,
        }
    }

    /// Resolve a canonical name or alias.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name || kind.aliases().contains(&name))
    }

    /// Uninitialized integrator of this kind.
    pub fn build<T: Integrable>(self) -> AnyIntegrator<T> {
        AnyIntegrator::new(self)
    }
}

impl fmt::Display for IntegratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IntegratorKind {
    type Err = IntegratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| IntegratorError::UnknownIntegrator {
            name: s.to_string(),
            available: Self::ALL.map(IntegratorKind::name).join(", "),
        })
    }
}

/// One integrator of any kind.
///
/// Bodies hold one of these per degree of freedom so the method can be
/// switched at runtime without boxing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum AnyIntegrator<T: Integrable> {
    Euler(Euler<T>),
    AdamsBashforth(AdamsBashforth<T>),
    AdamsMoulton(AdamsMoulton<T>),
}

macro_rules! delegate {
    ($self:expr, $inner:ident => $body:expr) => {
        match $self {
            AnyIntegrator::Euler($inner) => $body,
            AnyIntegrator::AdamsBashforth($inner) => $body,
            AnyIntegrator::AdamsMoulton($inner) => $body,
        }
    };
}

impl<T: Integrable> AnyIntegrator<T> {
    pub fn new(kind: IntegratorKind) -> Self {
        match kind {
            IntegratorKind::Euler => AnyIntegrator::Euler(Euler::new()),
            IntegratorKind::AdamsBashforth => AnyIntegrator::AdamsBashforth(AdamsBashforth::new()),
            IntegratorKind::AdamsMoulton => AnyIntegrator::AdamsMoulton(AdamsMoulton::new()),
        }
    }

    pub fn with_value(kind: IntegratorKind, start: T) -> Self {
        let mut integrator = Self::new(kind);
        integrator.init(start);
        integrator
    }

    pub fn kind(&self) -> IntegratorKind {
        match self {
            AnyIntegrator::Euler(_) => IntegratorKind::Euler,
            AnyIntegrator::AdamsBashforth(_) => IntegratorKind::AdamsBashforth,
            AnyIntegrator::AdamsMoulton(_) => IntegratorKind::AdamsMoulton,
        }
    }

    /// Replace the method, continuing from the current value.
    ///
    /// Derivative history belongs to the old method and is dropped. An
    /// uninitialized integrator stays uninitialized.
    pub fn swap_kind(&mut self, kind: IntegratorKind) {
        let initialized = self.is_initialized();
        let value = self.value();
        *self = Self::new(kind);
        if initialized {
            self.init(value);
        }
    }
}

impl<T: Integrable> Integrator<T> for AnyIntegrator<T> {
    fn init(&mut self, start: T) {
        delegate!(self, inner => inner.init(start))
    }

    fn reset(&mut self) {
        delegate!(self, inner => inner.reset())
    }

    fn integrate(&mut self, derivative: T, dt: Scalar) -> Result<T, IntegratorError> {
        delegate!(self, inner => inner.integrate(derivative, dt))
    }

    fn integrate_clip(
        &mut self,
        derivative: T,
        dt: Scalar,
        bound: T,
    ) -> Result<T, IntegratorError> {
        delegate!(self, inner => inner.integrate_clip(derivative, dt, bound))
    }

    fn value(&self) -> T {
        delegate!(self, inner => inner.value())
    }

    fn prev_value(&self) -> T {
        delegate!(self, inner => inner.prev_value())
    }

    fn shift_value(&mut self, offset: T) {
        delegate!(self, inner => inner.shift_value(offset))
    }

    fn is_initialized(&self) -> bool {
        delegate!(self, inner => inner.is_initialized())
    }

    fn name(&self) -> &'static str {
        delegate!(self, inner => inner.name())
    }

    fn convergence_order(&self) -> usize {
        delegate!(self, inner => inner.convergence_order())
    }

    fn history_len(&self) -> usize {
        delegate!(self, inner => inner.history_len())
    }
}
