use log::debug;
use skein_core::{Point, Stepper};

use crate::{
    Interpolator,
    event::{Action, Crossings, Event, Outcome, drive},
};

use super::Error;

/// The points and stepper of one time direction of a cache.
#[derive(Debug)]
pub(super) struct Branch<S> {
    /// Starts with the initial point, then moves away from it in time.
    pub(super) points: Vec<Point>,
    /// `None` once the stepper has run out.
    stepper: Option<S>,
    /// Crossing values at the last stored point.
    crossings: Crossings,
    direction: f64,
}

impl<S: Stepper> Branch<S> {
    pub(super) fn new(origin: Point, stepper: S, crossings: Crossings, direction: f64) -> Self {
        Self {
            points: vec![origin],
            stepper: Some(stepper),
            crossings,
            direction,
        }
    }

    pub(super) fn frontier(&self) -> &Point {
        &self.points[self.points.len() - 1]
    }

    fn covers(&self, time: f64) -> bool {
        self.direction * (self.frontier().time - time) >= 0.0
    }

    /// Pulls points until the stored range reaches `time`.
    pub(super) fn expand_to<I: Interpolator + ?Sized>(
        &mut self,
        events: &mut [Event],
        interp: &I,
        time: f64,
    ) -> Result<(), Error> {
        while !self.covers(time) {
            let next = self
                .stepper
                .as_mut()
                .and_then(|stepper| stepper.next_point().cloned());
            match next {
                Some(next) => self.accept(events, interp, next)?,
                None => return Err(self.retire()),
            }
        }
        Ok(())
    }

    /// Advances by `delta` if the stepper accepts explicit deltas.
    ///
    /// Returns `None` without stepping otherwise.
    pub(super) fn step<I: Interpolator + ?Sized>(
        &mut self,
        events: &mut [Event],
        interp: &I,
        delta: f64,
    ) -> Option<Result<(), Error>> {
        let configurable = self.stepper.as_mut()?.as_configurable()?;
        let next = configurable.next_step(delta).cloned();
        Some(match next {
            Some(next) => self.accept(events, interp, next),
            None => Err(self.retire()),
        })
    }

    /// Stores every remaining point of the stepper.
    pub(super) fn run_out<I: Interpolator + ?Sized>(
        &mut self,
        events: &mut [Event],
        interp: &I,
    ) -> Outcome {
        let start = self.frontier().clone();
        let Some(stepper) = self.stepper.as_mut() else {
            return Outcome::Exhausted;
        };

        let points = &mut self.points;
        let outcome = drive(
            stepper,
            &start,
            interp,
            events,
            &mut self.crossings,
            |point: &Point| -> Option<Action> {
                points.push(point.clone());
                None
            },
        );
        if outcome == Outcome::Exhausted {
            self.retire();
        }
        outcome
    }

    /// Returns the value at `time`, which must be within the stored range.
    pub(super) fn lookup<I: Interpolator + ?Sized>(&self, interp: &I, time: f64) -> Vec<f64> {
        let index = self
            .points
            .partition_point(|point| self.direction * (time - point.time) > 0.0);
        let Some(upper) = self.points.get(index) else {
            return self.frontier().value.clone();
        };
        if upper.time == time || index == 0 {
            return upper.value.clone();
        }
        interp.interpolate(&self.points[index - 1], upper, time)
    }

    /// Runs the events between the frontier and `next`, then stores `next`.
    fn accept<I: Interpolator + ?Sized>(
        &mut self,
        events: &mut [Event],
        interp: &I,
        next: Point,
    ) -> Result<(), Error> {
        let frontier = &self.points[self.points.len() - 1];
        if let Err(index) = self.crossings.advance(events, interp, frontier, &next) {
            return Err(Error::Event {
                index,
                reached: frontier.time,
            });
        }
        self.points.push(next);
        Ok(())
    }

    fn retire(&mut self) -> Error {
        let reached = self.frontier().time;
        if self.stepper.take().is_some() {
            debug!("cache retires the stepper heading {} at t = {reached}", self.heading());
        }
        Error::Exhausted { reached }
    }

    fn heading(&self) -> &'static str {
        if self.direction < 0.0 { "backward" } else { "forward" }
    }
}
