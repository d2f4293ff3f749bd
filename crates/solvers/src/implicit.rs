//! Implicit single-step methods for scalar problems.
//!
//! Each step solves an implicit equation for the next value `y`:
//!
//! ```text
//! implicit Euler:  y = x + h * f(t + h, y)
//! trapezium:       y = x + h/2 * (f(t, x) + f(t + h, y))
//! ```
//!
//! The equation is solved with Newton's method when the caller provides the
//! partial derivative `∂f/∂x`, and with the secant method otherwise. These
//! methods only apply to one-dimensional problems.

use std::{fmt, sync::Arc};

use log::{debug, warn};
use skein_core::{ConfigurableStepper, Ivp, Method, OutsideDomain, Point, Stepper};

use crate::{
    ConfigError,
    config::check_step,
    root::{self, newton, secant},
};

/// Shared handle to the partial derivative `∂f/∂x(t, x)` of a scalar problem.
pub type PartialFn = Arc<dyn Fn(&Point) -> Result<f64, OutsideDomain> + Send + Sync>;

/// The implicit equation solved at each step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Backward Euler, order 1.
    Euler,

    /// Trapezium rule, order 2.
    Trapezium,
}

impl Rule {
    /// Weight of the unknown endpoint slope in the update.
    fn weight(self) -> f64 {
        match self {
            Self::Euler => 1.0,
            Self::Trapezium => 0.5,
        }
    }
}

/// An implicit single-step method with a fixed step.
#[derive(Clone)]
pub struct Implicit {
    rule: Rule,
    step: f64,
    partial: Option<PartialFn>,
    root: root::Config,
}

impl Implicit {
    /// Creates an implicit method solving `rule` with step magnitude `step`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Step`] if `step` is not finite and positive.
    pub fn new(rule: Rule, step: f64) -> Result<Self, ConfigError> {
        check_step(step)?;
        Ok(Self {
            rule,
            step,
            partial: None,
            root: root::Config::default(),
        })
    }

    /// Implicit Euler with a fixed step.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Step`] if `step` is not finite and positive.
    pub fn euler(step: f64) -> Result<Self, ConfigError> {
        Self::new(Rule::Euler, step)
    }

    /// Trapezium rule with a fixed step.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Step`] if `step` is not finite and positive.
    pub fn trapezium(step: f64) -> Result<Self, ConfigError> {
        Self::new(Rule::Trapezium, step)
    }

    /// Solves each step with Newton's method using `partial` as `∂f/∂x`.
    #[must_use]
    pub fn with_partial<F>(mut self, partial: F) -> Self
    where
        F: Fn(&Point) -> Result<f64, OutsideDomain> + Send + Sync + 'static,
    {
        self.partial = Some(Arc::new(partial));
        self
    }

    /// Replaces the root finder configuration.
    #[must_use]
    pub fn with_root_config(mut self, config: root::Config) -> Self {
        self.root = config;
        self
    }

    /// Returns the rule solved at each step.
    #[must_use]
    pub fn rule(&self) -> Rule {
        self.rule
    }

    /// Returns the step magnitude.
    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }

    fn stepper(&self, ivp: &Ivp, step: f64) -> ImplicitStepper {
        let exhausted = ivp.dimension() != 1;
        if exhausted {
            warn!(
                "implicit methods need a one-dimensional problem, got dimension {}",
                ivp.dimension()
            );
        }
        ImplicitStepper {
            method: self.clone(),
            state: ivp.clone(),
            step,
            exhausted,
        }
    }

    /// Solves one step of size `h` from `ivp.start` and returns the next value.
    fn solve(&self, ivp: &Ivp, h: f64) -> Result<f64, root::Error> {
        let start = &ivp.start;
        let x = start.value[0];
        let time = start.time + h;
        let weight = self.rule.weight();

        // Everything in the update that does not depend on `y`.
        let known = match self.rule {
            Rule::Euler => x,
            Rule::Trapezium => x + h * (1.0 - weight) * ivp.slope()?[0],
        };
        let at = |y: f64| Point::new(time, [y]);
        let residual = |y: f64| -> Result<f64, OutsideDomain> {
            Ok(y - known - h * weight * ivp.derivative(&at(y))?[0])
        };

        match &self.partial {
            Some(partial) => newton(
                residual,
                |y| Ok(1.0 - h * weight * partial(&at(y))?),
                x,
                &self.root,
            ),
            None => {
                let mut predictor = x + h * ivp.slope()?[0];
                // Secant needs distinct seeds.
                if predictor == x {
                    predictor += h;
                }
                secant(residual, x, predictor, &self.root)
            }
        }
    }
}

impl fmt::Debug for Implicit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Implicit")
            .field("rule", &self.rule)
            .field("step", &self.step)
            .field("newton", &self.partial.is_some())
            .field("root", &self.root)
            .finish()
    }
}

impl Method for Implicit {
    type Stepper = ImplicitStepper;

    fn forward(&self, ivp: &Ivp) -> Self::Stepper {
        self.stepper(ivp, self.step)
    }

    fn backward(&self, ivp: &Ivp) -> Self::Stepper {
        self.stepper(ivp, -self.step)
    }
}

/// Stepper produced by [`Implicit`].
#[derive(Debug)]
pub struct ImplicitStepper {
    method: Implicit,
    state: Ivp,
    step: f64,
    exhausted: bool,
}

impl Stepper for ImplicitStepper {
    fn next_point(&mut self) -> Option<&Point> {
        self.next_step(self.step)
    }

    fn as_configurable(&mut self) -> Option<&mut dyn ConfigurableStepper> {
        Some(self)
    }
}

impl ConfigurableStepper for ImplicitStepper {
    fn next_step(&mut self, delta: f64) -> Option<&Point> {
        if self.exhausted {
            return None;
        }
        match self.method.solve(&self.state, delta) {
            Ok(value) => {
                self.state.start.value[0] = value;
                self.state.start.time += delta;
                Some(&self.state.start)
            }
            Err(err) => {
                debug!("implicit stepper exhausted at t = {}: {err}", self.state.start.time);
                self.exhausted = true;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    /// `x' = -k x` with `x(0) = 1`.
    fn decay(k: f64) -> Ivp {
        Ivp::new(Point::new(0.0, [1.0]), move |p| Ok(vec![-k * p.value[0]]))
    }

    fn nth(stepper: &mut impl Stepper, n: usize) -> Point {
        for _ in 1..n {
            stepper.next_point().expect("point");
        }
        stepper.next_point().expect("point").clone()
    }

    #[test]
    fn implicit_euler_matches_closed_form() {
        // For linear decay each step divides by (1 + k h).
        let method = Implicit::euler(0.1)
            .expect("valid step")
            .with_partial(|_| Ok(-2.0));
        let point = nth(&mut method.forward(&decay(2.0)), 10);

        assert_relative_eq!(point.value[0], 1.2_f64.powi(-10), epsilon = 1e-10);
        assert_relative_eq!(point.time, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn trapezium_matches_closed_form() {
        // Each step multiplies by (1 - k h / 2) / (1 + k h / 2).
        let method = Implicit::trapezium(0.1)
            .expect("valid step")
            .with_partial(|_| Ok(-2.0));
        let point = nth(&mut method.forward(&decay(2.0)), 10);

        assert_relative_eq!(point.value[0], (0.9_f64 / 1.1).powi(10), epsilon = 1e-10);
    }

    #[test]
    fn secant_agrees_with_newton() {
        let ivp = Ivp::new(Point::new(0.0, [0.5]), |p| {
            Ok(vec![p.value[0] * (1.0 - p.value[0])])
        });
        let newton = Implicit::trapezium(0.2)
            .expect("valid step")
            .with_partial(|p| Ok(1.0 - 2.0 * p.value[0]));
        let secant = Implicit::trapezium(0.2).expect("valid step");

        let a = nth(&mut newton.forward(&ivp), 5);
        let b = nth(&mut secant.forward(&ivp), 5);
        assert_relative_eq!(a.value[0], b.value[0], epsilon = 1e-10);

        // Logistic growth from 0.5 towards 1.
        let exact = 1.0 / (1.0 + (-1.0_f64).exp());
        assert_relative_eq!(a.value[0], exact, epsilon = 1e-3);
    }

    #[test]
    fn stiff_decay_stays_stable() {
        // Explicit Euler would blow up with k h = 10.
        let method = Implicit::euler(0.1).expect("valid step");
        let point = nth(&mut method.forward(&decay(100.0)), 20);
        assert!(point.value[0] > 0.0 && point.value[0] < 1e-10);
    }

    #[test]
    fn backward_steps() {
        let method = Implicit::euler(0.1)
            .expect("valid step")
            .with_partial(|_| Ok(-1.0));
        let point = nth(&mut method.backward(&decay(1.0)), 1);

        assert_relative_eq!(point.time, -0.1);
        assert_relative_eq!(point.value[0], 1.0 / 0.9, epsilon = 1e-12);
    }

    #[test]
    fn explicit_delta() {
        let method = Implicit::euler(1.0).expect("valid step");
        let mut stepper = method.forward(&decay(1.0));

        let point = stepper
            .as_configurable()
            .expect("implicit steppers are configurable")
            .next_step(0.5)
            .expect("point");
        assert_relative_eq!(point.time, 0.5);
        assert_relative_eq!(point.value[0], 1.0 / 1.5, epsilon = 1e-12);
    }

    #[test]
    fn multidimensional_problem_exhausts() {
        let ivp = Ivp::new(Point::new(0.0, [1.0, 0.0]), |p| Ok(p.value.clone()));
        let mut stepper = Implicit::euler(0.1).expect("valid step").forward(&ivp);
        assert!(stepper.next_point().is_none());
    }

    #[test]
    fn domain_failure_exhausts() {
        let ivp = Ivp::new(Point::new(0.0, [1.0]), |p| {
            if p.time < 0.25 {
                Ok(vec![0.0])
            } else {
                Err(OutsideDomain)
            }
        });
        let mut stepper = Implicit::euler(0.1).expect("valid step").forward(&ivp);

        assert!(stepper.next_point().is_some());
        assert!(stepper.next_point().is_some());
        assert!(stepper.next_point().is_none());
        assert!(stepper.next_point().is_none());
    }
}
