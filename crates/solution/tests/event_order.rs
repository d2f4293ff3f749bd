//! Several events inside one step run in the order they occur along it.

use std::{cell::RefCell, rc::Rc};

use approx::assert_relative_eq;
use skein_core::{Ivp, Method, Point};
use skein_solution::{Action, CacheSolution, Event, Linear, Outcome, step_until};
use skein_solvers::FixedStep;

type Log = Rc<RefCell<Vec<(usize, f64)>>>;

/// `x = t` through `start`.
fn clock(start: f64) -> Ivp {
    Ivp::new(Point::new(start, [start]), |_| Ok(vec![1.0]))
}

/// Events at `t = 2` (index 0) and `t = 1` (index 1) that log what they see.
fn events(log: &Log) -> Vec<Event> {
    [2.0, 1.0]
        .into_iter()
        .enumerate()
        .map(|(index, time)| {
            let log = Rc::clone(log);
            Event::new(
                move |p: &Point| p.value[0] - time,
                1e-12,
                move |p: &Point| -> Option<Action> {
                    log.borrow_mut().push((index, p.time));
                    None
                },
            )
            .expect("valid tolerance")
        })
        .collect()
}

fn assert_logged(log: &Log, expected: &[(usize, f64)]) {
    let log = log.borrow();
    assert_eq!(log.len(), expected.len());
    for ((index, time), (expected_index, expected_time)) in log.iter().zip(expected) {
        assert_eq!(index, expected_index);
        assert_relative_eq!(*time, *expected_time, epsilon = 1e-9);
    }
}

#[test]
fn forward_step_runs_earlier_event_first() {
    let log = Log::default();
    let mut events = events(&log);
    let ivp = clock(0.0);

    let mut stepper = FixedStep::euler(3.0).expect("valid step").forward(&ivp);
    let outcome = step_until(
        &mut stepper,
        &ivp.start,
        &Linear,
        &mut events,
        |_: &Point| Some(Action::StopEarly),
    );

    assert_eq!(outcome, Outcome::StoppedByObserver);
    assert_logged(&log, &[(1, 1.0), (0, 2.0)]);
}

#[test]
fn backward_step_runs_later_event_first() {
    let log = Log::default();
    let mut events = events(&log);
    let ivp = clock(3.0);

    let mut stepper = FixedStep::euler(3.0).expect("valid step").backward(&ivp);
    let outcome = step_until(
        &mut stepper,
        &ivp.start,
        &Linear,
        &mut events,
        |_: &Point| Some(Action::StopEarly),
    );

    assert_eq!(outcome, Outcome::StoppedByObserver);
    assert_logged(&log, &[(0, 2.0), (1, 1.0)]);
}

#[test]
fn cache_dispatches_in_order_both_ways() {
    let log = Log::default();
    let method = FixedStep::euler(3.0).expect("valid step");
    let mut solution = CacheSolution::new(&method, &clock(1.5), Linear, events(&log));

    // One step to t = 4.5 passes only the event at t = 2.
    solution.get(4.0).expect("reachable");
    assert_logged(&log, &[(0, 2.0)]);

    log.borrow_mut().clear();
    solution.get(-1.0).expect("reachable");
    assert_logged(&log, &[(1, 1.0)]);

    let log = Log::default();
    let mut solution = CacheSolution::new(&method, &clock(3.0), Linear, events(&log));
    solution.get(-1.0).expect("reachable");
    assert_logged(&log, &[(0, 2.0), (1, 1.0)]);
}
