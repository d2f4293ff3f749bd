/// Indicates why [`step_until`](super::step_until) returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The stepper ran out of points without any event stopping it.
    Exhausted,

    /// The action of the event at `index` stopped the driver.
    Event { index: usize },

    /// The point observer returned [`Action::StopEarly`](super::Action::StopEarly).
    StoppedByObserver,
}
