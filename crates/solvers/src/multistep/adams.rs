use log::debug;
use skein_core::{ConfigurableStepper, Ivp, Method, OutsideDomain, Point, Stepper};

use crate::{
    ConfigError,
    config::check_step,
    fixed::{Rk4, Scheme},
};

use super::{
    WINDOW, bashforth, moulton,
    window::{Node, Window},
};

/// Which formula produces the next value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Formula {
    Bashforth,
    Moulton,
}

/// Explicit fourth-order Adams-Bashforth with a fixed step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdamsBashforth {
    step: f64,
}

impl AdamsBashforth {
    /// Creates the method with step magnitude `step`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Step`] if `step` is not finite and positive.
    pub fn new(step: f64) -> Result<Self, ConfigError> {
        check_step(step)?;
        Ok(Self { step })
    }

    /// Returns the step magnitude.
    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }
}

impl Method for AdamsBashforth {
    type Stepper = AdamsStepper;

    fn forward(&self, ivp: &Ivp) -> Self::Stepper {
        AdamsStepper::new(Formula::Bashforth, ivp, self.step)
    }

    fn backward(&self, ivp: &Ivp) -> Self::Stepper {
        AdamsStepper::new(Formula::Bashforth, ivp, -self.step)
    }
}

/// Fourth-order Adams-Bashforth-Moulton predictor-corrector with a fixed step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdamsBashforthMoulton {
    step: f64,
}

impl AdamsBashforthMoulton {
    /// Creates the method with step magnitude `step`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Step`] if `step` is not finite and positive.
    pub fn new(step: f64) -> Result<Self, ConfigError> {
        check_step(step)?;
        Ok(Self { step })
    }

    /// Returns the step magnitude.
    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }
}

impl Method for AdamsBashforthMoulton {
    type Stepper = AdamsStepper;

    fn forward(&self, ivp: &Ivp) -> Self::Stepper {
        AdamsStepper::new(Formula::Moulton, ivp, self.step)
    }

    fn backward(&self, ivp: &Ivp) -> Self::Stepper {
        AdamsStepper::new(Formula::Moulton, ivp, -self.step)
    }
}

/// Stepper produced by [`AdamsBashforth`] and [`AdamsBashforthMoulton`].
///
/// The first three points come from RK4 while the history fills up.
///
/// [`next_step`](ConfigurableStepper::next_step) is supported, but the
/// formulas assume equally spaced nodes: every delta must equal the method's
/// step (with the stepper's sign) for the results to be meaningful.
#[derive(Debug)]
pub struct AdamsStepper {
    formula: Formula,
    state: Ivp,
    window: Window<WINDOW>,
    step: f64,
    exhausted: bool,
}

impl AdamsStepper {
    fn new(formula: Formula, ivp: &Ivp, step: f64) -> Self {
        Self {
            formula,
            state: ivp.clone(),
            window: Window::new(),
            step,
            exhausted: false,
        }
    }

    fn advance(&mut self, h: f64) -> Result<(), OutsideDomain> {
        let slope = self.state.slope()?;
        self.window.push(Node {
            value: self.state.start.value.clone(),
            slope,
        });

        if !self.window.is_full() {
            return Rk4.step(&mut self.state, h);
        }

        let predicted = Point::new(self.state.start.time + h, bashforth(&self.window, h));
        self.state.start = match self.formula {
            Formula::Bashforth => predicted,
            Formula::Moulton => {
                let slope = self.state.derivative(&predicted)?;
                Point::new(predicted.time, moulton(&self.window, &slope, h))
            }
        };
        Ok(())
    }
}

impl Stepper for AdamsStepper {
    fn next_point(&mut self) -> Option<&Point> {
        self.next_step(self.step)
    }

    fn as_configurable(&mut self) -> Option<&mut dyn ConfigurableStepper> {
        Some(self)
    }
}

impl ConfigurableStepper for AdamsStepper {
    fn next_step(&mut self, delta: f64) -> Option<&Point> {
        if self.exhausted {
            return None;
        }
        if let Err(err) = self.advance(delta) {
            debug!("adams stepper exhausted at t = {}: {err}", self.state.start.time);
            self.exhausted = true;
            return None;
        }
        Some(&self.state.start)
    }
}
