use crate::{Ivp, Point};

/// An iterator over points of the solution of an IVP in one time direction.
///
/// A stepper owns a private copy of the problem state and is meant for a
/// single consumer. Successive points have strictly increasing times (forward)
/// or strictly decreasing times (backward).
///
/// Once [`next_point`](Stepper::next_point) returns `None` the stepper is
/// exhausted and never yields another point. Exhaustion does not say why the
/// solution ended: leaving the derivative's domain, needing a step below the
/// minimum, and reaching a hard problem boundary all look the same.
pub trait Stepper {
    /// Advances to the next point of the solution.
    ///
    /// The returned point may be overwritten by the next call, so callers that
    /// keep it must clone it.
    fn next_point(&mut self) -> Option<&Point>;

    /// Returns this stepper as a [`ConfigurableStepper`] if it supports
    /// explicit step deltas.
    fn as_configurable(&mut self) -> Option<&mut dyn ConfigurableStepper> {
        None
    }
}

/// A stepper that also accepts the time delta of the next step.
pub trait ConfigurableStepper: Stepper {
    /// Like [`Stepper::next_point`], but the next point is at the time of the
    /// latest point plus `delta`.
    fn next_step(&mut self, delta: f64) -> Option<&Point>;
}

/// A way of approximating the solution of an IVP.
///
/// A method is a stateless factory of steppers. Both steppers start at the
/// problem's initial point and share no mutable state.
pub trait Method {
    type Stepper: Stepper;

    /// Makes a stepper towards increasing times.
    fn forward(&self, ivp: &Ivp) -> Self::Stepper;

    /// Makes a stepper towards decreasing times.
    fn backward(&self, ivp: &Ivp) -> Self::Stepper;
}

impl<S: Stepper + ?Sized> Stepper for Box<S> {
    fn next_point(&mut self) -> Option<&Point> {
        (**self).next_point()
    }

    fn as_configurable(&mut self) -> Option<&mut dyn ConfigurableStepper> {
        (**self).as_configurable()
    }
}

impl<S: Stepper + ?Sized> Stepper for &mut S {
    fn next_point(&mut self) -> Option<&Point> {
        (**self).next_point()
    }

    fn as_configurable(&mut self) -> Option<&mut dyn ConfigurableStepper> {
        (**self).as_configurable()
    }
}

impl<M: Method + ?Sized> Method for &M {
    type Stepper = M::Stepper;

    fn forward(&self, ivp: &Ivp) -> Self::Stepper {
        (**self).forward(ivp)
    }

    fn backward(&self, ivp: &Ivp) -> Self::Stepper {
        (**self).backward(ivp)
    }
}
