/// Errors that can occur when querying a [`CacheSolution`](super::CacheSolution).
#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq)]
pub enum Error {
    /// The stepper of that direction has no more points.
    #[error("solution ends at t = {reached}")]
    Exhausted { reached: f64 },

    /// An event action vetoed the next point of that direction.
    #[error("event {index} stopped the solution at t = {reached}")]
    Event { index: usize, reached: f64 },

    #[error("step must be finite and positive, got {step}")]
    InvalidStep { step: f64 },

    #[error("time must be finite, got {time}")]
    InvalidTime { time: f64 },
}
