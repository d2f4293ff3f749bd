use std::{fmt, sync::Arc};

use thiserror::Error;

use crate::Point;

/// Signals that a point lies outside the domain of a derivative function.
///
/// The derivative is a partial function; when it returns this error the
/// caller must not use any value computed for that point.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("point is outside the domain of the derivative")]
pub struct OutsideDomain;

/// Shared handle to a derivative function `f(t, x)`.
pub type DerivativeFn = Arc<dyn Fn(&Point) -> Result<Vec<f64>, OutsideDomain> + Send + Sync>;

/// An initial value problem given by a first-order ODE.
///
/// The derivative must be pure. Ideally its domain is restricted to the
/// connected component that contains the initial point, as otherwise a method
/// could jump to another component without noticing.
///
/// Cloning an `Ivp` deep-copies `start` and shares the derivative.
#[derive(Clone)]
pub struct Ivp {
    derivative: DerivativeFn,

    /// The initial values `(t0, x0)`.
    pub start: Point,
}

impl Ivp {
    /// Creates a problem from its initial point and derivative function.
    pub fn new<F>(start: Point, derivative: F) -> Self
    where
        F: Fn(&Point) -> Result<Vec<f64>, OutsideDomain> + Send + Sync + 'static,
    {
        Self {
            derivative: Arc::new(derivative),
            start,
        }
    }

    /// Evaluates the derivative at `point`.
    ///
    /// # Errors
    ///
    /// Returns [`OutsideDomain`] if `point` is outside the derivative's domain.
    pub fn derivative(&self, point: &Point) -> Result<Vec<f64>, OutsideDomain> {
        (self.derivative)(point)
    }

    /// Evaluates the derivative at the current start point.
    ///
    /// # Errors
    ///
    /// Returns [`OutsideDomain`] if the start point is outside the domain.
    pub fn slope(&self) -> Result<Vec<f64>, OutsideDomain> {
        (self.derivative)(&self.start)
    }

    /// Returns a shared handle to the derivative function.
    #[must_use]
    pub fn derivative_fn(&self) -> DerivativeFn {
        Arc::clone(&self.derivative)
    }

    /// Returns the dimension of the problem.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.start.dimension()
    }
}

impl fmt::Debug for Ivp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ivp")
            .field("start", &self.start)
            .finish_non_exhaustive()
    }
}
