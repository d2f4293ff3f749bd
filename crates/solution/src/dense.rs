//! Eagerly computed solution over a fixed interval.

mod error;

pub use error::Error;

use log::debug;
use skein_core::{Ivp, Method, Point, Stepper};

use crate::{Interpolator, columns::columns};

/// A solution computed once over `[start, end]` and queried by interpolation.
///
/// The stored points run in increasing time and include at most one point
/// beyond each end of the requested interval. If a stepper runs out before
/// covering its end, the stored range silently falls short; compare
/// [`start`](Self::start) and [`end`](Self::end) with the request to detect
/// it. Dense solutions do not support events.
#[derive(Debug, Clone)]
pub struct DenseSolution<I> {
    points: Vec<Point>,
    interp: I,
}

impl<I: Interpolator> DenseSolution<I> {
    /// Solves `ivp` with `method` over `[start, end]`.
    ///
    /// The interval need not contain the initial time. When it does not, the
    /// points between the initial time and the interval are discarded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Interval`] if the interval is not finite or reversed,
    /// and [`Error::Unreachable`] if the stepper heading towards the interval
    /// runs out before reaching it.
    pub fn solve<M: Method + ?Sized>(
        method: &M,
        ivp: &Ivp,
        start: f64,
        end: f64,
        interp: I,
    ) -> Result<Self, Error> {
        if !start.is_finite() || !end.is_finite() || start > end {
            return Err(Error::Interval { start, end });
        }

        let origin = &ivp.start;
        let points = if start >= origin.time {
            sweep(method.forward(ivp), origin, start, end, 1.0)?
        } else if end <= origin.time {
            let mut points = sweep(method.backward(ivp), origin, end, start, -1.0)?;
            points.reverse();
            points
        } else {
            let mut points = sweep(method.backward(ivp), origin, origin.time, start, -1.0)?;
            points.reverse();
            points.pop();
            points.extend(sweep(method.forward(ivp), origin, origin.time, end, 1.0)?);
            points
        };

        Ok(Self { points, interp })
    }

    /// Returns the time of the first stored point.
    #[must_use]
    pub fn start(&self) -> f64 {
        self.points[0].time
    }

    /// Returns the time of the last stored point.
    #[must_use]
    pub fn end(&self) -> f64 {
        self.points[self.points.len() - 1].time
    }

    /// Returns the stored points in increasing time.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Returns `[times, x0 values, x1 values, ...]` of the stored points.
    #[must_use]
    pub fn columns(&self) -> Vec<Vec<f64>> {
        columns(&self.points)
    }

    /// Returns the solution value at `time`.
    ///
    /// Stored points are returned exactly; other times are interpolated
    /// between the two bracketing points. Returns `None` if `time` is outside
    /// the stored range.
    #[must_use]
    pub fn get(&self, time: f64) -> Option<Vec<f64>> {
        if !(self.start() <= time && time <= self.end()) {
            return None;
        }
        Some(self.search(0, self.points.len() - 1, time))
    }

    /// Binary search for `time` within `points[lo..=hi]`.
    fn search(&self, lo: usize, hi: usize, time: f64) -> Vec<f64> {
        let (first, last) = (&self.points[lo], &self.points[hi]);
        if first.time == time {
            return first.value.clone();
        }
        if last.time == time {
            return last.value.clone();
        }
        if hi - lo <= 1 {
            return self.interp.interpolate(first, last, time);
        }

        let mid = lo + (hi - lo) / 2;
        if time < self.points[mid].time {
            self.search(lo, mid, time)
        } else {
            self.search(mid, hi, time)
        }
    }
}

/// Steps from `origin` in `direction` and collects the points covering the
/// span from `near` to `far`, in stepping order.
///
/// At most one point before `near` and one past `far` are kept. `near` may
/// be the origin's own time, in which case the origin is the first point.
fn sweep<S: Stepper>(
    mut stepper: S,
    origin: &Point,
    near: f64,
    far: f64,
    direction: f64,
) -> Result<Vec<Point>, Error> {
    let mut points = Vec::new();

    if direction * (near - origin.time) > 0.0 {
        let mut prev = origin.clone();
        loop {
            let Some(next) = stepper.next_point() else {
                return Err(Error::Unreachable { reached: prev.time });
            };
            let next = next.clone();
            let past = direction * (next.time - near);
            if past >= 0.0 {
                if past > 0.0 {
                    points.push(prev);
                }
                points.push(next);
                break;
            }
            prev = next;
        }
    } else {
        points.push(origin.clone());
    }

    let mut reached = points[points.len() - 1].time;
    while direction * (far - reached) > 0.0 {
        let Some(next) = stepper.next_point() else {
            debug!("dense solution stops short at t = {reached}, requested {far}");
            break;
        };
        reached = next.time;
        points.push(next.clone());
    }

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use skein_core::OutsideDomain;
    use skein_solvers::FixedStep;

    use crate::{Hermite, Linear};

    fn decay() -> Ivp {
        Ivp::new(Point::new(0.0, [1.0]), |p| Ok(vec![-p.value[0]]))
    }

    /// Decay that leaves its domain at `t = limit`.
    fn bounded_decay(limit: f64) -> Ivp {
        Ivp::new(Point::new(0.0, [1.0]), move |p| {
            if p.time.abs() < limit {
                Ok(vec![-p.value[0]])
            } else {
                Err(OutsideDomain)
            }
        })
    }

    fn assert_increasing(points: &[Point]) {
        for pair in points.windows(2) {
            assert!(pair[0].time < pair[1].time, "{} !< {}", pair[0].time, pair[1].time);
        }
    }

    #[test]
    fn covers_interval_around_origin() {
        let method = FixedStep::rk4(0.1).expect("valid step");
        let ivp = decay();
        let solution = DenseSolution::solve(&method, &ivp, -1.0, 2.0, Linear).expect("solvable");

        let points = solution.points();
        assert_increasing(points);
        assert!(solution.start() <= -1.0 && points[1].time > -1.0);
        assert!(solution.end() >= 2.0 && points[points.len() - 2].time < 2.0);
        assert_eq!(points.iter().filter(|p| p.time == 0.0).count(), 1);

        for t in [-0.95, -0.3, 0.0, 0.42, 1.77] {
            let value = solution.get(t).expect("inside range");
            assert_relative_eq!(value[0], (-t).exp(), max_relative = 5e-3);
        }
    }

    #[test]
    fn hermite_beats_linear_between_nodes() {
        let method = FixedStep::rk4(0.25).expect("valid step");
        let ivp = decay();
        let linear = DenseSolution::solve(&method, &ivp, 0.0, 2.0, Linear).expect("solvable");
        let hermite =
            DenseSolution::solve(&method, &ivp, 0.0, 2.0, Hermite::for_ivp(&ivp)).expect("solvable");

        let t: f64 = 1.1;
        let exact = (-t).exp();
        let linear_error = (linear.get(t).expect("inside")[0] - exact).abs();
        let hermite_error = (hermite.get(t).expect("inside")[0] - exact).abs();
        assert!(hermite_error < linear_error / 10.0);
    }

    #[test]
    fn stored_points_are_returned_exactly() {
        let method = FixedStep::modified_euler(0.3).expect("valid step");
        let solution = DenseSolution::solve(&method, &decay(), -2.0, 3.0, Linear).expect("solvable");

        for point in solution.points() {
            assert_eq!(solution.get(point.time), Some(point.value.clone()));
        }
    }

    #[test]
    fn interval_after_origin() {
        let method = FixedStep::rk4(0.1).expect("valid step");
        let solution = DenseSolution::solve(&method, &decay(), 1.0, 1.5, Linear).expect("solvable");

        let points = solution.points();
        assert_increasing(points);
        assert!(solution.start() <= 1.0 && solution.start() > 0.85);
        assert!(points[1].time > 1.0);
        assert!(solution.end() >= 1.5 && solution.end() < 1.65);
    }

    #[test]
    fn interval_before_origin() {
        let method = FixedStep::rk4(0.1).expect("valid step");
        let solution = DenseSolution::solve(&method, &decay(), -2.0, -1.0, Linear).expect("solvable");

        let points = solution.points();
        assert_increasing(points);
        assert!(solution.end() >= -1.0 && solution.end() < -0.85);
        assert!(points[points.len() - 2].time < -1.0);
        assert!(solution.start() <= -2.0 && solution.start() > -2.15);
        assert_relative_eq!(solution.get(-1.5).expect("inside")[0], 1.5_f64.exp(), max_relative = 5e-3);
    }

    #[test]
    fn degenerate_interval_at_origin() {
        let method = FixedStep::euler(0.1).expect("valid step");
        let solution = DenseSolution::solve(&method, &decay(), 0.0, 0.0, Linear).expect("solvable");

        assert_eq!(solution.points(), &[Point::new(0.0, [1.0])]);
        assert_eq!(solution.get(0.0), Some(vec![1.0]));
    }

    #[test]
    fn falls_short_when_stepper_ends() {
        let method = FixedStep::rk4(0.1).expect("valid step");
        let solution =
            DenseSolution::solve(&method, &bounded_decay(1.55), -3.0, 3.0, Linear).expect("solvable");

        assert_relative_eq!(solution.start(), -1.5, epsilon = 1e-9);
        assert_relative_eq!(solution.end(), 1.5, epsilon = 1e-9);
        assert!(solution.get(2.0).is_none());
        assert!(solution.get(-2.0).is_none());
        assert!(solution.get(f64::NAN).is_none());
    }

    #[test]
    fn unreachable_interval_fails() {
        let method = FixedStep::rk4(0.1).expect("valid step");
        let err = DenseSolution::solve(&method, &bounded_decay(0.55), 1.0, 2.0, Linear)
            .expect_err("interval is outside the domain");

        let Error::Unreachable { reached } = err else {
            panic!("unexpected error: {err}");
        };
        assert_relative_eq!(reached, 0.5, epsilon = 1e-9);
    }

    #[test]
    fn rejects_bad_interval() {
        let method = FixedStep::euler(0.1).expect("valid step");
        assert_eq!(
            DenseSolution::solve(&method, &decay(), 1.0, 0.0, Linear).err(),
            Some(Error::Interval { start: 1.0, end: 0.0 })
        );
        assert!(DenseSolution::solve(&method, &decay(), 0.0, f64::INFINITY, Linear).is_err());
    }

    #[test]
    fn columns_are_ordered_by_time() {
        let method = FixedStep::euler(0.5).expect("valid step");
        let solution = DenseSolution::solve(&method, &decay(), -1.0, 1.0, Linear).expect("solvable");

        let columns = solution.columns();
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0], vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
        assert_relative_eq!(columns[1][3], 0.5);
    }
}
