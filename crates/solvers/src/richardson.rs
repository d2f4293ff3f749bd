//! Adaptive step control by Richardson extrapolation.
//!
//! Wraps any fixed-step [`Scheme`] of order `k`. For a trial step `h` the
//! stepper compares one full step `F` against two half steps `H`:
//!
//! ```text
//! m = 1 / (2^k - 1)
//! e = ‖H - F‖ * (1 + m)
//! x_next = (1 + m) * H - m * F        if e <= tolerance * |h|
//! ```
//!
//! Rejected trials are retried with a step from [`update_step`]; a trial that
//! leaves the derivative's domain is retried with half the step.

use log::{debug, trace};
use skein_core::{Ivp, Method, OutsideDomain, Point, Stepper};

use crate::{
    AdaptiveConfig,
    control::update_step,
    fixed::{Euler, Rk4, Scheme},
    vector::distance,
};

/// An adaptive method built from a fixed-step scheme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Richardson<S> {
    scheme: S,
    config: AdaptiveConfig,
}

impl<S: Scheme> Richardson<S> {
    /// Wraps `scheme` with the given step control.
    pub fn new(scheme: S, config: AdaptiveConfig) -> Self {
        Self { scheme, config }
    }

    /// Returns the step control parameters.
    #[must_use]
    pub fn config(&self) -> &AdaptiveConfig {
        &self.config
    }
}

impl Richardson<Euler> {
    /// Adaptive Euler.
    pub fn euler(config: AdaptiveConfig) -> Self {
        Self::new(Euler, config)
    }
}

impl Richardson<Rk4> {
    /// Adaptive classical Runge-Kutta.
    pub fn rk4(config: AdaptiveConfig) -> Self {
        Self::new(Rk4, config)
    }
}

impl<S: Scheme + Clone> Method for Richardson<S> {
    type Stepper = RichardsonStepper<S>;

    fn forward(&self, ivp: &Ivp) -> Self::Stepper {
        RichardsonStepper::new(self, ivp, 1.0)
    }

    fn backward(&self, ivp: &Ivp) -> Self::Stepper {
        RichardsonStepper::new(self, ivp, -1.0)
    }
}

/// Stepper produced by [`Richardson`].
#[derive(Debug)]
pub struct RichardsonStepper<S> {
    scheme: S,
    config: AdaptiveConfig,
    state: Ivp,
    step: f64,
    exhausted: bool,
}

impl<S: Scheme + Clone> RichardsonStepper<S> {
    fn new(method: &Richardson<S>, ivp: &Ivp, direction: f64) -> Self {
        let config = method.config;
        Self {
            scheme: method.scheme.clone(),
            config,
            state: ivp.clone(),
            step: direction * config.initial_step().min(config.max_step()),
            exhausted: false,
        }
    }
}

impl<S: Scheme> RichardsonStepper<S> {
    /// Takes one full step and two half steps of size `h` from the current point.
    fn trial(&self, h: f64) -> Result<(Vec<f64>, Vec<f64>), OutsideDomain> {
        let mut full = self.state.clone();
        self.scheme.step(&mut full, h)?;

        let mut half = self.state.clone();
        self.scheme.step(&mut half, h / 2.0)?;
        self.scheme.step(&mut half, h / 2.0)?;

        Ok((full.start.value, half.start.value))
    }
}

impl<S: Scheme> Stepper for RichardsonStepper<S> {
    fn next_point(&mut self) -> Option<&Point> {
        if self.exhausted {
            return None;
        }

        let order = self.scheme.order();
        let m = 1.0 / (2.0_f64.powf(f64::from(order)) - 1.0);
        let tolerance = self.config.tolerance();

        loop {
            let h = self.step;
            if h.is_nan() || h.abs() < self.config.min_step() {
                debug!(
                    "adaptive stepper exhausted at t = {}: step {h:e} below minimum",
                    self.state.start.time
                );
                self.exhausted = true;
                return None;
            }

            let Ok((full, half)) = self.trial(h) else {
                trace!("trial step {h:e} left the domain, halving");
                self.step = h / 2.0;
                continue;
            };

            let error = distance(&half, &full) * (1.0 + m);
            let next = update_step(h, tolerance, error, self.config.max_step(), order);

            if error <= tolerance * h.abs() {
                let start = &mut self.state.start;
                for ((x, one), two) in start.value.iter_mut().zip(&full).zip(&half) {
                    *x = (1.0 + m) * two - m * one;
                }
                start.time += h;
                self.step = next;
                return Some(&self.state.start);
            }

            trace!("rejected step {h:e} with error {error:e}, retrying with {next:e}");
            self.step = next;
        }
    }
}
