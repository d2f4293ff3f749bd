/// Errors that can occur when computing a [`DenseSolution`](super::DenseSolution).
#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq)]
pub enum Error {
    #[error("interval [{start}, {end}] must be finite with start <= end")]
    Interval { start: f64, end: f64 },

    #[error("solution ends at t = {reached} before reaching the interval")]
    Unreachable { reached: f64 },
}
