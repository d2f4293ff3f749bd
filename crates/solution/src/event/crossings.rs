use log::debug;
use skein_core::Point;

use crate::Interpolator;

use super::{Action, Event};

/// Crossing values of a set of events at the latest accepted point.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Crossings {
    values: Vec<f64>,
}

impl Crossings {
    pub(crate) fn new(events: &[Event], point: &Point) -> Self {
        Self {
            values: events.iter().map(|event| event.crossing(point)).collect(),
        }
    }

    /// Detects, localizes and dispatches the events occurring between `prev`
    /// and `next`, in the order they occur along the step.
    ///
    /// On success the stored values move to `next`. If an action vetoes, its
    /// index is returned and the stored values stay at `prev`.
    pub(crate) fn advance<I: Interpolator + ?Sized>(
        &mut self,
        events: &mut [Event],
        interp: &I,
        prev: &Point,
        next: &Point,
    ) -> Result<(), usize> {
        let values: Vec<f64> = events.iter().map(|event| event.crossing(next)).collect();

        let mut occurred: Vec<(usize, Point)> = self
            .values
            .iter()
            .zip(&values)
            .enumerate()
            .filter(|(_, (before, after))| changes_sign(**before, **after))
            .map(|(index, _)| (index, events[index].locate(interp, prev, next)))
            .collect();

        let direction = if next.time < prev.time { -1.0 } else { 1.0 };
        occurred.sort_by(|(_, a), (_, b)| (direction * a.time).total_cmp(&(direction * b.time)));

        for (index, point) in &occurred {
            if let Some(Action::StopEarly) = events[*index].act(point) {
                debug!("event {index} stopped stepping at t = {}", point.time);
                return Err(*index);
            }
        }

        self.values = values;
        Ok(())
    }
}

/// Sign change between consecutive crossing values, counting exact zeros.
fn changes_sign(before: f64, after: f64) -> bool {
    (before <= 0.0 && after >= 0.0) || (before >= 0.0 && after <= 0.0)
}
