//! Lazily expanded solution in both time directions.

mod branch;
mod error;

pub use error::Error;

use skein_core::{Ivp, Method, Point, Stepper};

use crate::{
    Interpolator,
    columns::columns,
    event::{Crossings, Event, Outcome},
};

use branch::Branch;

/// A solution that computes points only when a query needs them.
///
/// The cache keeps one stepper per direction and the points each has
/// produced so far. Events are checked on every new point, with the crossing
/// values carried over between queries.
///
/// When an event action vetoes, the point that triggered it is discarded and
/// the query fails with [`Error::Event`]. The stepper is kept, so a later
/// query pulls its next point and checks the events again from the last
/// stored point. When a stepper runs out it is dropped, and every later
/// expansion in that direction fails with [`Error::Exhausted`].
#[derive(Debug)]
pub struct CacheSolution<S, I> {
    forward: Branch<S>,
    backward: Branch<S>,
    events: Vec<Event>,
    interp: I,
}

impl<S: Stepper, I: Interpolator> CacheSolution<S, I> {
    /// Creates a cache for `ivp` that steps with `method`.
    ///
    /// Nothing is computed until the first query.
    pub fn new<M>(method: &M, ivp: &Ivp, interp: I, events: Vec<Event>) -> Self
    where
        M: Method<Stepper = S> + ?Sized,
    {
        let crossings = Crossings::new(&events, &ivp.start);
        Self {
            forward: Branch::new(ivp.start.clone(), method.forward(ivp), crossings.clone(), 1.0),
            backward: Branch::new(ivp.start.clone(), method.backward(ivp), crossings, -1.0),
            events,
            interp,
        }
    }

    /// Returns the solution value at `time`, expanding the cache if needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTime`] if `time` is not finite, and
    /// [`Error::Exhausted`] or [`Error::Event`] if the cache cannot expand far
    /// enough. Points stored before the failure are kept.
    pub fn get(&mut self, time: f64) -> Result<Vec<f64>, Error> {
        if !time.is_finite() {
            return Err(Error::InvalidTime { time });
        }
        let branch = if time >= self.forward.points[0].time {
            &mut self.forward
        } else {
            &mut self.backward
        };
        branch.expand_to(&mut self.events, &self.interp, time)?;
        Ok(branch.lookup(&self.interp, time))
    }

    /// Takes one step of size `step` past the last forward point.
    ///
    /// A configurable stepper is driven with exactly that delta. Otherwise
    /// this is a query at [`end`](Self::end) plus `step`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidStep`] if `step` is not finite and positive,
    /// and otherwise fails like [`get`](Self::get).
    pub fn step_forward(&mut self, step: f64) -> Result<Point, Error> {
        check_step(step)?;
        match self.forward.step(&mut self.events, &self.interp, step) {
            Some(result) => result.map(|()| self.forward.frontier().clone()),
            None => {
                let time = self.end() + step;
                self.get(time).map(|value| Point::new(time, value))
            }
        }
    }

    /// Takes one step of size `step` before the first backward point.
    ///
    /// # Errors
    ///
    /// Same as [`step_forward`](Self::step_forward).
    pub fn step_backward(&mut self, step: f64) -> Result<Point, Error> {
        check_step(step)?;
        match self.backward.step(&mut self.events, &self.interp, -step) {
            Some(result) => result.map(|()| self.backward.frontier().clone()),
            None => {
                let time = self.start() - step;
                self.get(time).map(|value| Point::new(time, value))
            }
        }
    }

    /// Expands forward until the stepper runs out or an event vetoes.
    pub fn step_to_end(&mut self) -> Outcome {
        self.forward.run_out(&mut self.events, &self.interp)
    }

    /// Expands backward until the stepper runs out or an event vetoes.
    pub fn step_to_beginning(&mut self) -> Outcome {
        self.backward.run_out(&mut self.events, &self.interp)
    }

    /// Returns the earliest stored time.
    #[must_use]
    pub fn start(&self) -> f64 {
        self.backward.frontier().time
    }

    /// Returns the latest stored time.
    #[must_use]
    pub fn end(&self) -> f64 {
        self.forward.frontier().time
    }

    /// Returns the forward points, starting with the initial point.
    #[must_use]
    pub fn forward_points(&self) -> &[Point] {
        &self.forward.points
    }

    /// Returns the backward points in decreasing time, without the initial
    /// point.
    #[must_use]
    pub fn backward_points(&self) -> &[Point] {
        &self.backward.points[1..]
    }

    /// Returns `[times, x0 values, x1 values, ...]` of all stored points in
    /// increasing time.
    #[must_use]
    pub fn columns(&self) -> Vec<Vec<f64>> {
        columns(
            self.backward_points()
                .iter()
                .rev()
                .chain(self.forward_points()),
        )
    }

    /// Returns the events watched by this cache.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }
}

fn check_step(step: f64) -> Result<(), Error> {
    if step.is_finite() && step > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidStep { step })
    }
}
