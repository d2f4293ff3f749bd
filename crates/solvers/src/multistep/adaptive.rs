use std::collections::VecDeque;

use log::{debug, trace};
use skein_core::{Ivp, Method, OutsideDomain, Point, Stepper};

use crate::{
    AdaptiveConfig,
    control::update_step,
    fixed::{Rk4, Scheme},
    vector::distance,
};

use super::{
    MILNE, WINDOW, bashforth, moulton,
    window::{Node, Window},
};

/// Adams-Bashforth-Moulton with step control from the corrector difference.
///
/// A change of step invalidates the window, which is then rebuilt from the
/// last accepted point with three RK4 steps. Those bootstrap points are only
/// returned once the predictor-corrector step that follows them is accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AdaptivePredictorCorrector {
    config: AdaptiveConfig,
}

impl AdaptivePredictorCorrector {
    /// Creates the method with the given step control.
    #[must_use]
    pub fn new(config: AdaptiveConfig) -> Self {
        Self { config }
    }

    /// Returns the step control parameters.
    #[must_use]
    pub fn config(&self) -> &AdaptiveConfig {
        &self.config
    }

    fn stepper(&self, ivp: &Ivp, direction: f64) -> AdaptivePcStepper {
        AdaptivePcStepper {
            config: self.config,
            state: ivp.clone(),
            window: Window::new(),
            step: direction * self.config.initial_step().min(self.config.max_step()),
            pending: VecDeque::new(),
            current: ivp.start.clone(),
            exhausted: false,
        }
    }
}

impl Method for AdaptivePredictorCorrector {
    type Stepper = AdaptivePcStepper;

    fn forward(&self, ivp: &Ivp) -> Self::Stepper {
        self.stepper(ivp, 1.0)
    }

    fn backward(&self, ivp: &Ivp) -> Self::Stepper {
        self.stepper(ivp, -1.0)
    }
}

/// Outcome of one predictor-corrector trial.
struct Attempt {
    bootstrap: Vec<Point>,
    next: Point,
    error: f64,
}

/// Stepper produced by [`AdaptivePredictorCorrector`].
#[derive(Debug)]
pub struct AdaptivePcStepper {
    config: AdaptiveConfig,
    /// Starts at the last accepted point.
    state: Ivp,
    /// Nodes up to, but excluding, the last accepted point.
    window: Window<WINDOW>,
    step: f64,
    pending: VecDeque<Point>,
    current: Point,
    exhausted: bool,
}

impl AdaptivePcStepper {
    /// Computes and queues the next accepted points.
    ///
    /// Returns `false` when the stepper cannot continue.
    fn refill(&mut self) -> bool {
        let anchor = match self.state.slope() {
            Ok(slope) => Node {
                value: self.state.start.value.clone(),
                slope,
            },
            Err(err) => {
                debug!("predictor-corrector exhausted at t = {}: {err}", self.state.start.time);
                return false;
            }
        };
        self.window.push(anchor.clone());

        let tolerance = self.config.tolerance();
        loop {
            let h = self.step;
            if h.is_nan() || h.abs() < self.config.min_step() {
                debug!(
                    "predictor-corrector exhausted at t = {}: step {h:e} below minimum",
                    self.state.start.time
                );
                return false;
            }

            let attempt = match self.attempt(h) {
                Ok(attempt) if attempt.error <= tolerance * h.abs() => attempt,
                Ok(rejected) => {
                    let next = update_step(h, tolerance, rejected.error, self.config.max_step(), 4);
                    trace!(
                        "rejected step {h:e} with error {:e}, rebuilding history with {next:e}",
                        rejected.error
                    );
                    self.step = next;
                    self.window.clear();
                    self.window.push(anchor.clone());
                    continue;
                }
                Err(_) => {
                    trace!("trial step {h:e} left the domain, rebuilding history with half the step");
                    self.step = h / 2.0;
                    self.window.clear();
                    self.window.push(anchor.clone());
                    continue;
                }
            };

            self.pending.extend(attempt.bootstrap);
            self.pending.push_back(attempt.next.clone());
            self.state.start = attempt.next;

            if 10.0 * attempt.error < tolerance * h.abs() {
                let grown = update_step(h, tolerance, attempt.error, self.config.max_step(), 4);
                if grown.abs() > h.abs() {
                    trace!("growing step {h:e} to {grown:e}, rebuilding history");
                    self.step = grown;
                    self.window.clear();
                }
            }
            return true;
        }
    }

    /// Runs one predictor-corrector step of size `h` past the newest node,
    /// bootstrapping the window first if it only holds the anchor.
    fn attempt(&mut self, h: f64) -> Result<Attempt, OutsideDomain> {
        let mut bootstrap = Vec::new();
        let mut time = self.state.start.time;

        if !self.window.is_full() {
            let mut scratch = self.state.clone();
            for i in 1..WINDOW {
                Rk4.step(&mut scratch, h)?;
                scratch.start.time = self.state.start.time + h * i as f64;
                self.window.push(Node {
                    value: scratch.start.value.clone(),
                    slope: scratch.slope()?,
                });
                bootstrap.push(scratch.start.clone());
            }
            time = scratch.start.time;
        }

        let predicted = Point::new(time + h, bashforth(&self.window, h));
        let slope = self.state.derivative(&predicted)?;
        let corrected = moulton(&self.window, &slope, h);
        let error = distance(&corrected, &predicted.value) * MILNE;

        Ok(Attempt {
            bootstrap,
            next: Point::new(predicted.time, corrected),
            error,
        })
    }
}

impl Stepper for AdaptivePcStepper {
    fn next_point(&mut self) -> Option<&Point> {
        if self.exhausted {
            return None;
        }
        if self.pending.is_empty() && !self.refill() {
            self.exhausted = true;
            return None;
        }
        self.current = self.pending.pop_front()?;
        Some(&self.current)
    }
}
