/// Control actions returned by event actions and point observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop driving the stepper.
    ///
    /// Returned by an event action, this vetoes the step in which the event
    /// occurred and skips the remaining events of that step.
    StopEarly,
}
