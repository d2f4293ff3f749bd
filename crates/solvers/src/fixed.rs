//! Fixed-step single-step methods.
//!
//! A [`FixedStep`] method repeatedly applies a [`Scheme`] with a constant
//! step:
//!
//! ```text
//! x_{n+1} = scheme(x_n, h),  t_{n+1} = t_n + h
//! ```
//!
//! # Example
//!
//! ```ignore
//! use skein_core::Method;
//! use skein_solvers::FixedStep;
//!
//! let mut stepper = FixedStep::rk4(0.1)?.forward(&ivp);
//! while let Some(point) = stepper.next_point() {
//!     println!("t={}: {:?}", point.time, point.value);
//! }
//! ```

mod scheme;

pub use scheme::{Euler, ModifiedEuler, Rk4, Scheme};

use log::debug;
use skein_core::{ConfigurableStepper, Ivp, Method, Point, Stepper};

use crate::{ConfigError, config::check_step};

/// A method that advances by a constant step with a single-step scheme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedStep<S> {
    scheme: S,
    step: f64,
}

impl<S: Scheme> FixedStep<S> {
    /// Creates a method applying `scheme` with step magnitude `step`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Step`] if `step` is not finite and positive.
    pub fn new(scheme: S, step: f64) -> Result<Self, ConfigError> {
        check_step(step)?;
        Ok(Self { scheme, step })
    }

    /// Returns the step magnitude.
    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }
}

impl FixedStep<Euler> {
    /// Explicit Euler with a fixed step.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Step`] if `step` is not finite and positive.
    pub fn euler(step: f64) -> Result<Self, ConfigError> {
        Self::new(Euler, step)
    }
}

impl FixedStep<ModifiedEuler> {
    /// Modified Euler with a fixed step.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Step`] if `step` is not finite and positive.
    pub fn modified_euler(step: f64) -> Result<Self, ConfigError> {
        Self::new(ModifiedEuler, step)
    }
}

impl FixedStep<Rk4> {
    /// Classical Runge-Kutta with a fixed step.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Step`] if `step` is not finite and positive.
    pub fn rk4(step: f64) -> Result<Self, ConfigError> {
        Self::new(Rk4, step)
    }
}

impl<S: Scheme + Clone> Method for FixedStep<S> {
    type Stepper = FixedStepper<S>;

    fn forward(&self, ivp: &Ivp) -> Self::Stepper {
        FixedStepper::new(self.scheme.clone(), ivp, self.step)
    }

    fn backward(&self, ivp: &Ivp) -> Self::Stepper {
        FixedStepper::new(self.scheme.clone(), ivp, -self.step)
    }
}

/// Stepper produced by [`FixedStep`].
#[derive(Debug)]
pub struct FixedStepper<S> {
    scheme: S,
    state: Ivp,
    step: f64,
    exhausted: bool,
}

impl<S: Scheme> FixedStepper<S> {
    fn new(scheme: S, ivp: &Ivp, step: f64) -> Self {
        Self {
            scheme,
            state: ivp.clone(),
            step,
            exhausted: false,
        }
    }
}

impl<S: Scheme> Stepper for FixedStepper<S> {
    fn next_point(&mut self) -> Option<&Point> {
        self.next_step(self.step)
    }

    fn as_configurable(&mut self) -> Option<&mut dyn ConfigurableStepper> {
        Some(self)
    }
}

impl<S: Scheme> ConfigurableStepper for FixedStepper<S> {
    fn next_step(&mut self, delta: f64) -> Option<&Point> {
        if self.exhausted {
            return None;
        }
        if let Err(err) = self.scheme.step(&mut self.state, delta) {
            debug!("fixed-step stepper exhausted near t = {}: {err}", self.state.start.time);
            self.exhausted = true;
            return None;
        }
        Some(&self.state.start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use skein_core::OutsideDomain;

    fn decay() -> Ivp {
        Ivp::new(Point::new(0.0, [1.0]), |p| Ok(vec![-p.value[0]]))
    }

    #[test]
    fn rejects_bad_step() {
        assert_eq!(FixedStep::euler(0.0), Err(ConfigError::Step));
        assert_eq!(FixedStep::rk4(f64::INFINITY), Err(ConfigError::Step));
        assert_eq!(FixedStep::modified_euler(-0.1), Err(ConfigError::Step));
    }

    #[test]
    fn euler_stepper_follows_closed_form() {
        let method = FixedStep::euler(0.1).expect("valid step");
        let mut stepper = method.forward(&decay());

        for n in 1..=20 {
            let point = stepper.next_point().expect("decay never ends");
            assert_relative_eq!(point.value[0], 0.9_f64.powi(n), max_relative = 1e-12);
        }
    }

    #[test]
    fn directions_are_independent() {
        let method = FixedStep::rk4(0.25).expect("valid step");
        let ivp = decay();
        let mut forward = method.forward(&ivp);
        let mut backward = method.backward(&ivp);

        let ahead = forward.next_point().expect("point").clone();
        let behind = backward.next_point().expect("point").clone();

        assert_relative_eq!(ahead.time, 0.25);
        assert_relative_eq!(behind.time, -0.25);
        assert_relative_eq!(ahead.value[0], (-0.25_f64).exp(), epsilon = 1e-4);
        assert_relative_eq!(behind.value[0], 0.25_f64.exp(), epsilon = 1e-4);
        assert_relative_eq!(ivp.start.value[0], 1.0);
    }

    #[test]
    fn accepts_explicit_delta() {
        let method = FixedStep::euler(1.0).expect("valid step");
        let mut stepper = method.forward(&decay());

        let configurable = stepper.as_configurable().expect("fixed steppers are configurable");
        let point = configurable.next_step(0.5).expect("point");
        assert_relative_eq!(point.time, 0.5);
        assert_relative_eq!(point.value[0], 0.5);

        assert_relative_eq!(stepper.next_point().expect("point").time, 1.5);
    }

    #[test]
    fn exhaustion_is_permanent() {
        // Defined only for t < 0.35.
        let ivp = Ivp::new(Point::new(0.0, [0.0]), |p| {
            if p.time < 0.35 {
                Ok(vec![1.0])
            } else {
                Err(OutsideDomain)
            }
        });
        let mut stepper = FixedStep::euler(0.1).expect("valid step").forward(&ivp);

        let mut count = 0;
        while stepper.next_point().is_some() {
            count += 1;
        }
        assert_eq!(count, 4);
        assert!(stepper.next_point().is_none());
        assert!(stepper.next_step(-1.0).is_none());
    }
}
