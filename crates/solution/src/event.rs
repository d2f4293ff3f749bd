//! Events along a solution and the generic stepping driver.
//!
//! An [`Event`] occurs wherever its crossing function changes sign between two
//! consecutive points. The occurrence is localized by bisection on values
//! synthesized with an [`Interpolator`], and the event's action then decides
//! whether stepping may go on.

mod action;
mod crossings;
mod outcome;

pub use action::Action;
pub use outcome::Outcome;

pub(crate) use crossings::Crossings;

use std::fmt;

use skein_core::{Observer, Point, Stepper};
use thiserror::Error;

use crate::Interpolator;

/// Errors that can occur when creating an [`Event`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EventError {
    #[error("event tolerance must be finite and non-negative")]
    Tolerance,
}

/// A scalar condition watched along a solution.
///
/// The crossing function must be continuous in time along the trajectory;
/// its zeros are the occurrences of the event. The action observes every
/// localized occurrence and may return [`Action::StopEarly`] to veto.
pub struct Event {
    crossing: Box<dyn Fn(&Point) -> f64>,
    tolerance: f64,
    action: Box<dyn Observer<Point, Action>>,
}

impl Event {
    /// Creates an event from its crossing function, localization tolerance
    /// and action.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::Tolerance`] if `tolerance` is negative or not
    /// finite.
    pub fn new<C, A>(crossing: C, tolerance: f64, action: A) -> Result<Self, EventError>
    where
        C: Fn(&Point) -> f64 + 'static,
        A: Observer<Point, Action> + 'static,
    {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(EventError::Tolerance);
        }
        Ok(Self {
            crossing: Box::new(crossing),
            tolerance,
            action: Box::new(action),
        })
    }

    /// Evaluates the crossing function at `point`.
    #[must_use]
    pub fn crossing(&self, point: &Point) -> f64 {
        (self.crossing)(point)
    }

    /// Returns the localization tolerance.
    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Localizes the occurrence between two points whose crossing values
    /// differ in sign.
    ///
    /// Bisects the time interval with values from `interp` until the crossing
    /// magnitude drops below the tolerance, or until the interval cannot be
    /// split any further in floating point. `prev` is the point the step
    /// started from and may lie on either side of `next` in time.
    #[must_use]
    pub fn locate<I: Interpolator + ?Sized>(&self, interp: &I, prev: &Point, next: &Point) -> Point {
        let downwards = self.crossing(prev) > 0.0;
        let (mut near, mut far) = (prev.time, next.time);

        loop {
            let mid = 0.5 * (near + far);
            let point = Point::new(mid, interp.interpolate(prev, next, mid));
            let value = self.crossing(&point);

            if value.abs() < self.tolerance || mid == near || mid == far {
                return point;
            }
            if (value > 0.0) == downwards {
                near = mid;
            } else {
                far = mid;
            }
        }
    }

    pub(crate) fn act(&mut self, point: &Point) -> Option<Action> {
        self.action.observe(point)
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("tolerance", &self.tolerance)
            .finish_non_exhaustive()
    }
}

/// Drives a stepper until it is exhausted or something stops it.
///
/// # Algorithm
///
/// 1. Evaluate every crossing function at `start`, the point the stepper
///    starts from.
/// 2. For each point the stepper yields:
///    - Find the events whose crossing value changed sign.
///    - Localize each of them with [`Event::locate`].
///    - Run their actions in the order the occurrences are met along the
///      step. If one returns [`Action::StopEarly`], return [`Outcome::Event`]
///      without running the rest.
///    - Pass the point to `observer`. If it returns [`Action::StopEarly`],
///      return [`Outcome::StoppedByObserver`].
/// 3. Return [`Outcome::Exhausted`] once the stepper has no more points.
pub fn step_until<S, I, Obs>(
    stepper: &mut S,
    start: &Point,
    interp: &I,
    events: &mut [Event],
    observer: Obs,
) -> Outcome
where
    S: Stepper + ?Sized,
    I: Interpolator + ?Sized,
    Obs: Observer<Point, Action>,
{
    let mut crossings = Crossings::new(events, start);
    drive(stepper, start, interp, events, &mut crossings, observer)
}

/// Runs [`step_until`] with crossing values already known at `start`.
pub(crate) fn drive<S, I, Obs>(
    stepper: &mut S,
    start: &Point,
    interp: &I,
    events: &mut [Event],
    crossings: &mut Crossings,
    mut observer: Obs,
) -> Outcome
where
    S: Stepper + ?Sized,
    I: Interpolator + ?Sized,
    Obs: Observer<Point, Action>,
{
    let mut prev = start.clone();
    while let Some(point) = stepper.next_point() {
        let next = point.clone();
        if let Err(index) = crossings.advance(events, interp, &prev, &next) {
            return Outcome::Event { index };
        }
        if let Some(Action::StopEarly) = observer.observe(&next) {
            return Outcome::StoppedByObserver;
        }
        prev = next;
    }
    Outcome::Exhausted
}
